//! Bucket sequence generation.
//!
//! [`TimeBucketingService`] turns "which buckets does this view need" into a
//! concrete, ascending, gapless list of [`Bucket`]s. All sequences are pure
//! functions of the input instant and the configured timezone, so results
//! for the same `(instant, scale)` pair are always identical and can be
//! merged with per-bucket counts by [`Bucket::id`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::calendar::Calendar;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Bucket, BucketType, Scale};

/// When a sequence generator stops adding buckets.
#[derive(Debug, Clone, Copy)]
enum Until {
    /// Exactly this many buckets.
    Count(usize),
    /// Every bucket whose start is before this boundary.
    Before(DateTime<Utc>),
}

/// Produces single buckets and bucket sequences for dot-grid views.
///
/// If the calendar cannot produce a boundary (only possible at the edges of
/// chrono's representable range) a sequence is cut short instead of
/// failing. The shortfall is logged at `warn` level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBucketingService {
    calendar: Calendar,
}

impl TimeBucketingService {
    pub fn new(tz: Tz) -> Self {
        Self {
            calendar: Calendar::new(tz),
        }
    }

    /// Build a service for the timezone named in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.timezone()?))
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// The bucket of `bucket_type` containing `instant`.
    pub fn bucket(&self, instant: DateTime<Utc>, bucket_type: BucketType) -> Bucket {
        let start = self.calendar.normalize(instant, bucket_type);
        Bucket::new(bucket_type, start, &self.calendar)
    }

    /// The 24 hour buckets starting at local midnight of the instant's day.
    pub fn hour_buckets_for_day(&self, instant: DateTime<Utc>) -> Vec<Bucket> {
        let first = self.calendar.start_of_day(instant);
        self.sequence(BucketType::Hour, first, Until::Count(24))
    }

    /// Monday through Sunday of the instant's week.
    pub fn day_buckets_for_week(&self, instant: DateTime<Utc>) -> Vec<Bucket> {
        let first = self.calendar.start_of_week(instant);
        self.sequence(BucketType::Day, first, Until::Count(7))
    }

    /// One day bucket per calendar day of the instant's month.
    pub fn day_buckets_for_month(&self, instant: DateTime<Utc>) -> Vec<Bucket> {
        let month = self.bucket(instant, BucketType::Month);
        self.sequence(BucketType::Day, month.start(), Until::Before(month.end()))
    }

    /// Week buckets from the Monday on or before the 1st of the instant's
    /// month, for every week that starts before the month ends.
    ///
    /// The first week may begin in the previous month; the last may run
    /// into the next one. Between 4 and 6 buckets depending on alignment.
    pub fn week_buckets_for_month(&self, instant: DateTime<Utc>) -> Vec<Bucket> {
        let month = self.bucket(instant, BucketType::Month);
        let first = self.calendar.start_of_week(month.start());
        self.sequence(BucketType::Week, first, Until::Before(month.end()))
    }

    /// January through December of the instant's year.
    pub fn month_buckets_for_year(&self, instant: DateTime<Utc>) -> Vec<Bucket> {
        let first = self.calendar.start_of_year(instant);
        self.sequence(BucketType::Month, first, Until::Count(12))
    }

    /// Every day of the instant's year, 365 or 366 buckets.
    pub fn day_buckets_for_year(&self, instant: DateTime<Utc>) -> Vec<Bucket> {
        let year = self.bucket(instant, BucketType::Year);
        self.sequence(BucketType::Day, year.start(), Until::Before(year.end()))
    }

    /// Buckets for the "today" view at `scale`.
    pub fn buckets_for_today_view(&self, instant: DateTime<Utc>, scale: Scale) -> Vec<Bucket> {
        match scale {
            Scale::Hours => self.hour_buckets_for_day(instant),
            Scale::Days => self.day_buckets_for_week(instant),
            Scale::Weeks => self.week_buckets_for_month(instant),
            Scale::Months => self.month_buckets_for_year(instant),
        }
    }

    /// Buckets for the week view at `scale`. The week view has no hour
    /// granularity, so [`Scale::Hours`] shows the days of the week.
    pub fn buckets_for_week_view(&self, instant: DateTime<Utc>, scale: Scale) -> Vec<Bucket> {
        match scale {
            Scale::Hours | Scale::Days => self.day_buckets_for_week(instant),
            Scale::Weeks => self.week_buckets_for_month(instant),
            Scale::Months => self.month_buckets_for_year(instant),
        }
    }

    /// Every bucket of `bucket_type` overlapping `[start, end)`, ascending.
    pub fn buckets_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        bucket_type: BucketType,
    ) -> Vec<Bucket> {
        if start >= end {
            return Vec::new();
        }
        let first = self.calendar.normalize(start, bucket_type);
        self.sequence(bucket_type, first, Until::Before(end))
    }

    fn sequence(&self, bucket_type: BucketType, first: DateTime<Utc>, until: Until) -> Vec<Bucket> {
        let mut buckets = Vec::new();
        let mut start = first;

        loop {
            let done = match until {
                Until::Count(count) => buckets.len() >= count,
                Until::Before(boundary) => start >= boundary,
            };
            if done {
                break;
            }

            let bucket = Bucket::new(bucket_type, start, &self.calendar);
            buckets.push(bucket);

            // A stalled or unrepresentable step ends the sequence early.
            if bucket.end() <= start || bucket.end() == DateTime::<Utc>::MAX_UTC {
                if matches!(until, Until::Count(count) if buckets.len() < count) {
                    warn!(
                        %bucket_type,
                        %first,
                        produced = buckets.len(),
                        "bucket sequence cut short by calendar range"
                    );
                }
                break;
            }
            start = bucket.end();
        }

        debug!(
            %bucket_type,
            %first,
            count = buckets.len(),
            tz = %self.calendar.tz(),
            "generated bucket sequence"
        );
        buckets
    }
}
