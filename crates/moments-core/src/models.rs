//! Core data types for moments-core.
//!
//! - [`BucketType`] - Bucket granularity (hour/day/week/month/year)
//! - [`Scale`] - Zoom level of a dot-grid view
//! - [`Bucket`] - One normalized period with its end boundary
//! - [`BucketId`] - Stable identity of a bucket
//! - [`BucketSummary`] - A bucket paired with its record count

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::calendar::Calendar;
use crate::error::{MomentsError, Result};

/// Bucket granularity, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketType {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl BucketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketType::Hour => "hour",
            BucketType::Day => "day",
            BucketType::Week => "week",
            BucketType::Month => "month",
            BucketType::Year => "year",
        }
    }
}

impl fmt::Display for BucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketType {
    type Err = MomentsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hour" => Ok(BucketType::Hour),
            "day" => Ok(BucketType::Day),
            "week" => Ok(BucketType::Week),
            "month" => Ok(BucketType::Month),
            "year" => Ok(BucketType::Year),
            _ => Err(MomentsError::ParseError(format!(
                "Unknown bucket type: '{}'. Expected 'hour', 'day', 'week', 'month', or 'year'",
                s
            ))),
        }
    }
}

/// Zoom level selected in a dot-grid view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Hours,
    Days,
    Weeks,
    Months,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Hours => write!(f, "hours"),
            Scale::Days => write!(f, "days"),
            Scale::Weeks => write!(f, "weeks"),
            Scale::Months => write!(f, "months"),
        }
    }
}

impl FromStr for Scale {
    type Err = MomentsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hours" => Ok(Scale::Hours),
            "days" => Ok(Scale::Days),
            "weeks" => Ok(Scale::Weeks),
            "months" => Ok(Scale::Months),
            _ => Err(MomentsError::ParseError(format!(
                "Unknown scale: '{}'. Expected 'hours', 'days', 'weeks', or 'months'",
                s
            ))),
        }
    }
}

/// Stable identity of a bucket: its type and start in whole epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BucketId(String);

impl BucketId {
    fn new(bucket_type: BucketType, start: DateTime<Utc>) -> Self {
        Self(format!("{}-{}", bucket_type, start.timestamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One normalized period.
///
/// `start` must already be normalized for `bucket_type`; the bucket does
/// not re-normalize it. Equality and hashing only consider the type and
/// the start.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Bucket {
    #[serde(rename = "type")]
    bucket_type: BucketType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Bucket {
    /// Wrap an already-normalized `start`, computing the end boundary with
    /// calendar-aware period addition.
    ///
    /// If the end is not representable the bucket is left open-ended at the
    /// maximum UTC instant.
    pub fn new(bucket_type: BucketType, start: DateTime<Utc>, calendar: &Calendar) -> Self {
        let end = calendar
            .add_period(start, bucket_type)
            .unwrap_or_else(|| {
                warn!(%start, %bucket_type, "bucket end out of range, leaving it open");
                DateTime::<Utc>::MAX_UTC
            });
        Self {
            bucket_type,
            start,
            end,
        }
    }

    pub fn bucket_type(&self) -> BucketType {
        self.bucket_type
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end boundary.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `start <= instant < end`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn id(&self) -> BucketId {
        BucketId::new(self.bucket_type, self.start)
    }
}

impl PartialEq for Bucket {
    fn eq(&self, other: &Self) -> bool {
        self.bucket_type == other.bucket_type && self.start == other.start
    }
}

impl Eq for Bucket {}

impl Hash for Bucket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bucket_type.hash(state);
        self.start.hash(state);
    }
}

/// A bucket together with the number of records captured inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketSummary {
    pub bucket: Bucket,
    pub count: usize,
}

impl BucketSummary {
    pub fn new(bucket: Bucket, count: usize) -> Self {
        Self { bucket, count }
    }

    pub fn has_moments(&self) -> bool {
        self.count > 0
    }
}
