use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Inspect calendar buckets, year grids and grid layouts for a moments journal
#[derive(Parser, Debug)]
#[command(name = "moments", version)]
#[command(about = "Inspect calendar buckets, year grids and grid layouts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// IANA timezone (overrides the config file)
    #[arg(short, long, global = true)]
    pub tz: Option<String>,

    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the bucket containing an instant
    Bucket(BucketArgs),
    /// Show the bucket sequence of a view, with moment counts
    View(ViewArgs),
    /// List every bucket overlapping a time range
    Range(RangeArgs),
    /// Show every day of a year with today/future flags and counts
    Year(YearArgs),
    /// Size a year grid for a region
    Layout(LayoutArgs),
}

#[derive(clap::Args, Debug)]
pub struct BucketArgs {
    /// Bucket type: hour, day, week, month, year
    #[arg(long = "type", default_value = "day")]
    pub bucket_type: String,

    /// Instant to bucket (RFC3339 or epoch seconds)
    #[arg(long)]
    pub at: String,
}

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    /// View: today, week
    #[arg(long, default_value = "today")]
    pub view: String,

    /// Scale: hours, days, weeks, months
    #[arg(short, long, default_value = "hours")]
    pub scale: String,

    /// Reference instant (RFC3339 or epoch seconds, default: now)
    #[arg(long)]
    pub at: Option<String>,

    /// File with one moment timestamp per line
    #[arg(long)]
    pub moments: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct RangeArgs {
    /// Bucket type: hour, day, week, month, year
    #[arg(long = "type", default_value = "day")]
    pub bucket_type: String,

    /// Start of range (inclusive)
    #[arg(long)]
    pub start: String,

    /// End of range (exclusive)
    #[arg(long)]
    pub end: String,
}

#[derive(clap::Args, Debug)]
pub struct YearArgs {
    /// Calendar year (default: the year of --today)
    #[arg(long)]
    pub year: Option<i32>,

    /// Reference instant for today/future flags (default: now)
    #[arg(long)]
    pub today: Option<String>,

    /// File with one moment timestamp per line
    #[arg(long)]
    pub moments: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    /// Available width
    #[arg(long)]
    pub width: f64,

    /// Available height
    #[arg(long)]
    pub height: f64,

    /// Number of items (default: days in the current year)
    #[arg(long)]
    pub count: Option<usize>,

    /// Minimum column count
    #[arg(long)]
    pub min_columns: Option<usize>,

    /// Maximum column count
    #[arg(long)]
    pub max_columns: Option<usize>,

    /// Gap size as a fraction of the item size
    #[arg(long)]
    pub spacing_ratio: Option<f64>,
}
