//! Record store boundary.
//!
//! The core never persists anything. It asks a [`RecordStore`] how many
//! moments fall inside each bucket or day and merges the answers into
//! display records. [`InMemoryRecordStore`] is a reference implementation
//! of the contract used by tests and the CLI.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::calendar::Calendar;
use crate::error::Result;
use crate::models::{Bucket, BucketSummary};

/// What was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MomentKind {
    Note { text: String },
    Photo { path: String },
    Link { url: String },
    /// A bare marker with no payload.
    Dot,
}

/// The time frame a moment was captured for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeIntent {
    #[default]
    Now,
    Today,
    ThisWeek,
}

/// A captured moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Moment {
    pub id: u64,
    #[serde(flatten)]
    pub kind: MomentKind,
    pub intent: TimeIntent,
    pub captured_at: DateTime<Utc>,
}

/// Counting queries the bucketing core needs from storage.
pub trait RecordStore {
    /// Number of moments captured in `[start, end)`.
    fn count_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<usize>;

    /// Moment counts per day for the inclusive day range `from..=to`.
    ///
    /// Keys are day-start instants; days without moments are absent.
    fn fetch_counts_by_day(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BTreeMap<DateTime<Utc>, usize>>;

    fn fetch_count(&self, bucket: &Bucket) -> Result<usize> {
        self.count_between(bucket.start(), bucket.end())
    }

    /// One summary per bucket, in the order given.
    fn fetch_summaries(&self, buckets: &[Bucket]) -> Result<Vec<BucketSummary>> {
        buckets
            .iter()
            .map(|bucket| Ok(BucketSummary::new(*bucket, self.fetch_count(bucket)?)))
            .collect()
    }
}

/// Moments held in memory, ordered by capture time.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    calendar: Calendar,
    moments: Vec<Moment>,
    next_id: u64,
}

impl InMemoryRecordStore {
    /// `calendar` decides which day a moment belongs to.
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            moments: Vec::new(),
            next_id: 1,
        }
    }

    pub fn create(
        &mut self,
        kind: MomentKind,
        intent: TimeIntent,
        captured_at: DateTime<Utc>,
    ) -> Moment {
        let id = self.next_id.max(1);
        self.next_id = id + 1;

        let moment = Moment {
            id,
            kind,
            intent,
            captured_at,
        };
        let index = self
            .moments
            .partition_point(|existing| existing.captured_at <= captured_at);
        self.moments.insert(index, moment.clone());
        debug!(id, %captured_at, "created moment");
        moment
    }

    pub fn fetch(&self, id: u64) -> Option<&Moment> {
        self.moments.iter().find(|moment| moment.id == id)
    }

    /// Moments captured in `[start, end)`, oldest first.
    pub fn fetch_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> &[Moment] {
        if start >= end {
            return &[];
        }
        let lo = self.moments.partition_point(|m| m.captured_at < start);
        let hi = self.moments.partition_point(|m| m.captured_at < end);
        &self.moments[lo..hi]
    }

    /// Returns `true` if a moment was removed.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.moments.len();
        self.moments.retain(|moment| moment.id != id);
        before != self.moments.len()
    }

    pub fn len(&self) -> usize {
        self.moments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moments.is_empty()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn count_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<usize> {
        Ok(self.fetch_between(start, end).len())
    }

    fn fetch_counts_by_day(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BTreeMap<DateTime<Utc>, usize>> {
        let first_day = self.calendar.start_of_day(from);
        let last_day = self.calendar.start_of_day(to);

        let mut counts = BTreeMap::new();
        for moment in &self.moments {
            if moment.captured_at < first_day {
                continue;
            }
            let day = self.calendar.start_of_day(moment.captured_at);
            if day > last_day {
                break;
            }
            *counts.entry(day).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
