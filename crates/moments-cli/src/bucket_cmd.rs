use std::process::ExitCode;

use moments_core::{BucketType, Config, TimeBucketingService};

use crate::cli::BucketArgs;
use crate::cli::OutputFormat;
use crate::error::{CliResult, emit};
use crate::shared::{BucketRow, instant_arg};

pub fn run_bucket(
    args: BucketArgs,
    config: &Config,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let service = TimeBucketingService::from_config(config)?;
    let bucket_type: BucketType = args.bucket_type.parse()?;
    let instant = instant_arg("at", &args.at)?;

    let bucket = service.bucket(instant, bucket_type);
    let row = BucketRow::new(&bucket, service.calendar(), None)?;

    emit(output_format, &row, |row| println!("{}", row.to_text()))?;
    Ok(ExitCode::SUCCESS)
}
