//! Full-year day sequences for the year grid.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, warn};

use crate::calendar::{Calendar, days_in_year};
use crate::config::Config;
use crate::error::Result;

/// One calendar day of a year grid.
///
/// Identity is the local calendar date: two `YearDay`s for the same date
/// are equal whatever their counts or flags.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct YearDay {
    /// Local calendar date, serialized as `YYYY-MM-DD`.
    #[serde(rename = "day")]
    pub local_date: NaiveDate,
    /// First instant of the day in the generator's timezone.
    pub date: DateTime<Utc>,
    pub experience_count: usize,
    pub is_today: bool,
    pub is_future: bool,
}

impl YearDay {
    /// `YYYY-MM-DD` identity of the day.
    pub fn id(&self) -> String {
        self.local_date.format("%Y-%m-%d").to_string()
    }
}

impl PartialEq for YearDay {
    fn eq(&self, other: &Self) -> bool {
        self.local_date == other.local_date
    }
}

impl Eq for YearDay {}

impl Hash for YearDay {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_date.hash(state);
    }
}

/// Builds the Jan 1 to Dec 31 sequence of [`YearDay`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearDayGenerator {
    calendar: Calendar,
}

impl YearDayGenerator {
    pub fn new(tz: Tz) -> Self {
        Self {
            calendar: Calendar::new(tz),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.timezone()?))
    }

    /// Generate the days of `year` relative to the current instant.
    pub fn generate_now(&self, year: i32, counts: &BTreeMap<DateTime<Utc>, usize>) -> Vec<YearDay> {
        self.generate(year, counts, Utc::now())
    }

    /// Generate the days of `year`, one per calendar day, in order.
    ///
    /// `counts` is keyed by day-start instants as produced by
    /// [`Calendar::start_of_day`]; missing days count as zero. The day
    /// containing `reference` is flagged as today and every later day as
    /// future. If `reference` lies outside `year`, no day is today.
    pub fn generate(
        &self,
        year: i32,
        counts: &BTreeMap<DateTime<Utc>, usize>,
        reference: DateTime<Utc>,
    ) -> Vec<YearDay> {
        let (Some(first), Some(last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            warn!(year, "year outside the supported calendar range");
            return Vec::new();
        };

        let today = self.calendar.start_of_day(reference);
        let mut days = Vec::with_capacity(days_in_year(year) as usize);
        let mut date = first;

        while date <= last {
            match self.calendar.day_start(date) {
                Some(start) => days.push(YearDay {
                    local_date: date,
                    date: start,
                    experience_count: counts.get(&start).copied().unwrap_or(0),
                    is_today: start == today,
                    is_future: start > today,
                }),
                None => warn!(
                    %date,
                    tz = %self.calendar.tz(),
                    "no valid local time on day, skipping"
                ),
            }

            let Some(next) = date.succ_opt() else {
                break;
            };
            date = next;
        }

        debug!(year, days = days.len(), %reference, "generated year days");
        days
    }
}
