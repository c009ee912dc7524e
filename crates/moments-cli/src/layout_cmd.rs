use std::process::ExitCode;

use chrono::{Datelike, Utc};
use moments_core::{Calendar, Config, YearGridLayout, calculate_layout, days_in_year};
use serde::Serialize;

use crate::cli::LayoutArgs;
use crate::cli::OutputFormat;
use crate::error::{CliResult, emit};

#[derive(Debug, Serialize)]
struct LayoutOutput {
    width: f64,
    height: f64,
    item_count: usize,
    #[serde(flatten)]
    layout: YearGridLayout,
    total_width: f64,
    total_height: f64,
}

pub fn run_layout(
    args: LayoutArgs,
    config: &Config,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let mut layout_config = config.layout;
    if let Some(min_columns) = args.min_columns {
        layout_config.min_columns = min_columns;
    }
    if let Some(max_columns) = args.max_columns {
        layout_config.max_columns = max_columns;
    }
    if let Some(spacing_ratio) = args.spacing_ratio {
        layout_config.spacing_ratio = spacing_ratio;
    }
    layout_config.validate()?;

    let item_count = match args.count {
        Some(count) => count,
        None => {
            let calendar = Calendar::new(config.timezone()?);
            let now = Utc::now();
            let today = calendar.local_date(now).unwrap_or_else(|| now.date_naive());
            days_in_year(today.year()) as usize
        }
    };

    let layout = calculate_layout(args.width, args.height, item_count, &layout_config);
    let output = LayoutOutput {
        width: args.width,
        height: args.height,
        item_count,
        layout,
        total_width: layout.total_width(),
        total_height: layout.total_height(),
    };

    emit(output_format, &output, |output| {
        let layout = &output.layout;
        println!("Grid: {} columns x {} rows", layout.columns, layout.rows);
        println!("Item size: {:.2}", layout.item_size);
        println!(
            "Spacing: {:.2} horizontal, {:.2} vertical",
            layout.horizontal_spacing, layout.vertical_spacing
        );
        println!(
            "Used: {:.2} x {:.2} of {} x {}",
            output.total_width, output.total_height, output.width, output.height
        );
    })?;
    Ok(ExitCode::SUCCESS)
}
