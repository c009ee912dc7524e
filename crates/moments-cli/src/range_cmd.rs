use std::process::ExitCode;

use moments_core::{BucketType, Config, TimeBucketingService};

use crate::cli::RangeArgs;
use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult, emit};
use crate::shared::{BucketRow, instant_arg};

pub fn run_range(
    args: RangeArgs,
    config: &Config,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let service = TimeBucketingService::from_config(config)?;
    let bucket_type: BucketType = args.bucket_type.parse()?;
    let start = instant_arg("start", &args.start)?;
    let end = instant_arg("end", &args.end)?;

    if start >= end {
        return Err(CliError::input(format!(
            "Invalid range: start '{}' must be earlier than end '{}'",
            args.start, args.end
        )));
    }

    let rows = service
        .buckets_in_range(start, end, bucket_type)
        .iter()
        .map(|bucket| BucketRow::new(bucket, service.calendar(), None))
        .collect::<CliResult<Vec<_>>>()?;

    emit(output_format, &rows, |rows| {
        for row in rows {
            println!("{}", row.to_text());
        }
    })?;
    Ok(ExitCode::SUCCESS)
}
