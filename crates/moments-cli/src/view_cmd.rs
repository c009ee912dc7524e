use std::process::ExitCode;

use moments_core::{Config, RecordStore, Scale, TimeBucketingService};

use crate::cli::ViewArgs;
use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult, emit};
use crate::shared::{BucketRow, instant_arg_or_now, load_store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Today,
    Week,
}

fn parse_view(s: &str) -> CliResult<View> {
    match s.to_lowercase().as_str() {
        "today" => Ok(View::Today),
        "week" => Ok(View::Week),
        _ => Err(CliError::input(format!(
            "Invalid view '{}'. Expected: today, week",
            s
        ))),
    }
}

pub fn run_view(
    args: ViewArgs,
    config: &Config,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let service = TimeBucketingService::from_config(config)?;
    let view = parse_view(&args.view)?;
    let scale: Scale = args.scale.parse()?;
    let instant = instant_arg_or_now("at", args.at.as_deref())?;
    let store = load_store(args.moments.as_deref(), *service.calendar())?;

    let buckets = match view {
        View::Today => service.buckets_for_today_view(instant, scale),
        View::Week => service.buckets_for_week_view(instant, scale),
    };
    let rows = store
        .fetch_summaries(&buckets)?
        .iter()
        .map(|summary| BucketRow::new(&summary.bucket, service.calendar(), Some(summary.count)))
        .collect::<CliResult<Vec<_>>>()?;

    emit(output_format, &rows, |rows| {
        for row in rows {
            println!("{}", row.to_text());
        }
    })?;
    Ok(ExitCode::SUCCESS)
}
