use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

mod bucket_cmd;
mod cli;
mod error;
mod layout_cmd;
mod range_cmd;
mod shared;
mod view_cmd;
mod year_cmd;

use bucket_cmd::run_bucket;
use cli::{Cli, Commands};
use layout_cmd::run_layout;
use range_cmd::run_range;
use shared::load_config;
use view_cmd::run_view;
use year_cmd::run_year;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Parsed CLI args: {:?}", cli);

    let output_format = cli.output_format;

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => return err.report(output_format),
    };

    let result = match cli.command {
        Commands::Bucket(args) => run_bucket(args, &config, output_format),
        Commands::View(args) => run_view(args, &config, output_format),
        Commands::Range(args) => run_range(args, &config, output_format),
        Commands::Year(args) => run_year(args, &config, output_format),
        Commands::Layout(args) => run_layout(args, &config, output_format),
    };

    match result {
        Ok(code) => code,
        Err(err) => err.report(output_format),
    }
}
