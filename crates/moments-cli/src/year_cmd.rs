use std::process::ExitCode;

use chrono::{Datelike, NaiveDate};
use moments_core::{Calendar, Config, RecordStore, YearDay, YearDayGenerator};

use crate::cli::YearArgs;
use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult, emit};
use crate::shared::{instant_arg_or_now, load_store};

pub fn run_year(
    args: YearArgs,
    config: &Config,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let generator = YearDayGenerator::from_config(config)?;
    let calendar = Calendar::new(config.timezone()?);
    let reference = instant_arg_or_now("today", args.today.as_deref())?;
    let year = match args.year {
        Some(year) => year,
        None => calendar
            .local_date(reference)
            .map(|date| date.year())
            .ok_or_else(|| {
                CliError::input(format!(
                    "--today {} has no local date in {}",
                    reference,
                    calendar.tz()
                ))
            })?,
    };

    let bounds = NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .and_then(|(first, last)| calendar.day_start(first).zip(calendar.day_start(last)));
    let Some((from, to)) = bounds else {
        return Err(CliError::input(format!("Year {} is out of range", year)));
    };

    let store = load_store(args.moments.as_deref(), calendar)?;
    let counts = store.fetch_counts_by_day(from, to)?;
    let days = generator.generate(year, &counts, reference);

    emit(output_format, &days, |days| {
        for day in days {
            println!("{} {} {}", day.id(), day.experience_count, day_state(day));
        }
    })?;
    Ok(ExitCode::SUCCESS)
}

fn day_state(day: &YearDay) -> &'static str {
    if day.is_today {
        "today"
    } else if day.is_future {
        "future"
    } else {
        "past"
    }
}
