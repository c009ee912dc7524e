use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::{DateTime, TimeZone, Utc};
use moments_core::tz::{format_local, format_rfc3339_utc};
use moments_core::{
    Bucket, BucketType, Calendar, Config, InMemoryRecordStore, MomentKind, TimeIntent,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::Cli;
use crate::error::{CliError, CliResult};

/// Config file (if any) with the `--tz` override applied.
pub fn load_config(cli: &Cli) -> CliResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(tz) = &cli.tz {
        config.timezone = tz.clone();
        config.timezone()?;
    }
    debug!(?config, "loaded config");
    Ok(config)
}

/// Parse an RFC3339 timestamp or integer epoch seconds.
pub fn parse_instant(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let trimmed = s.trim();

    if let Ok(seconds) = trimmed.parse::<i64>() {
        return Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| anyhow!("Epoch seconds out of range: {}", seconds));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| {
            format!(
                "Invalid timestamp '{}'. Expected RFC3339 or epoch seconds",
                trimmed
            )
        })
}

/// [`parse_instant`] for a command-line argument.
pub fn instant_arg(name: &str, s: &str) -> CliResult<DateTime<Utc>> {
    parse_instant(s).map_err(|e| CliError::input(format!("Invalid --{}: {:#}", name, e)))
}

/// The given instant, or now.
pub fn instant_arg_or_now(name: &str, s: Option<&str>) -> CliResult<DateTime<Utc>> {
    s.map_or_else(|| Ok(Utc::now()), |s| instant_arg(name, s))
}

/// Read one timestamp per line; blank lines and `#` comments are skipped.
pub fn read_moments(path: &Path) -> anyhow::Result<Vec<DateTime<Utc>>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read moments file '{}'", path.display()))?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            parse_instant(line).with_context(|| format!("{}:{}", path.display(), index + 1))
        })
        .collect()
}

/// A store holding one dot per timestamp in `path`, or an empty store.
pub fn load_store(path: Option<&Path>, calendar: Calendar) -> CliResult<InMemoryRecordStore> {
    let mut store = InMemoryRecordStore::new(calendar);
    if let Some(path) = path {
        let instants = read_moments(path).map_err(|e| CliError::input(format!("{:#}", e)))?;
        for instant in instants {
            store.create(MomentKind::Dot, TimeIntent::Now, instant);
        }
        debug!(moments = store.len(), path = %path.display(), "loaded moments");
    }
    Ok(store)
}

#[derive(Debug, Serialize)]
pub struct BucketRow {
    pub id: String,
    #[serde(rename = "type")]
    pub bucket_type: BucketType,
    pub start_local: String,
    pub end_local: String,
    pub start_utc: String,
    pub end_utc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl BucketRow {
    /// Fails when a bucket boundary has no local time in the calendar's
    /// timezone, which only happens at the edges of the supported range.
    pub fn new(bucket: &Bucket, calendar: &Calendar, count: Option<usize>) -> CliResult<Self> {
        let tz = calendar.tz();
        let id = bucket.id().to_string();
        let local = |instant: DateTime<Utc>| {
            format_local(instant, tz).ok_or_else(|| {
                CliError::input(format!(
                    "Bucket {} cannot be shown in {}: {} is outside the supported range",
                    id,
                    tz,
                    format_rfc3339_utc(&instant)
                ))
            })
        };
        Ok(Self {
            start_local: local(bucket.start())?,
            end_local: local(bucket.end())?,
            start_utc: format_rfc3339_utc(&bucket.start()),
            end_utc: format_rfc3339_utc(&bucket.end()),
            bucket_type: bucket.bucket_type(),
            id,
            count,
        })
    }

    pub fn to_text(&self) -> String {
        let mut line = format!("{}: {} to {}", self.id, self.start_local, self.end_local);
        if let Some(count) = self.count {
            line.push_str(&format!(" ({})", count));
        }
        line
    }
}
