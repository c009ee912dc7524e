//! # moments-core
//!
//! Calendar bucketing for a moments journal.
//!
//! Captured moments are shown as dot grids at hour, day, week, month and
//! year scales. This crate maps instants to canonical periods in a
//! configured IANA timezone, produces the bucket sequences each grid needs,
//! builds full-year day sequences, and sizes the year grid so it never
//! overflows its region.
//!
//! ## Features
//!
//! - **Calendar-aware periods**: boundaries are computed on local dates, so
//!   DST days are 23 or 25 hours long and months keep their real lengths.
//! - **ISO weeks**: weeks always start on Monday.
//! - **Stable identity**: buckets compare and hash by `(type, start)`.
//! - **No failure modes**: out-of-range calendar arithmetic degrades and
//!   logs instead of panicking.
//!
//! ## Example
//!
//! ```rust
//! use moments_core::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let service = TimeBucketingService::new(parse_tz("Europe/Berlin").unwrap());
//! let instant = Utc.with_ymd_and_hms(2024, 1, 3, 14, 30, 0).single().unwrap();
//!
//! let hours = service.buckets_for_today_view(instant, Scale::Hours);
//! assert_eq!(hours.len(), 24);
//!
//! let week = service.bucket(instant, BucketType::Week);
//! println!("{} starts {}", week.id(), week.start());
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod service;
pub mod store;
pub mod tz;
pub mod year;

// Re-export commonly used types at the crate root
pub use calendar::{Calendar, days_in_year, is_leap_year};
pub use config::Config;
pub use error::{MomentsError, Result};
pub use layout::{LayoutConfig, YearGridLayout, calculate_layout};
pub use models::{Bucket, BucketId, BucketSummary, BucketType, Scale};
pub use service::TimeBucketingService;
pub use store::{InMemoryRecordStore, Moment, MomentKind, RecordStore, TimeIntent};
pub use year::{YearDay, YearDayGenerator};

/// Prelude module for convenient imports.
///
/// ```
/// use moments_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::calendar::{Calendar, days_in_year, is_leap_year};
    pub use crate::config::Config;
    pub use crate::error::{MomentsError, Result};
    pub use crate::layout::{LayoutConfig, YearGridLayout, calculate_layout};
    pub use crate::models::*;
    pub use crate::service::TimeBucketingService;
    pub use crate::store::{InMemoryRecordStore, Moment, MomentKind, RecordStore, TimeIntent};
    pub use crate::tz::parse_tz;
    pub use crate::year::{YearDay, YearDayGenerator};
}
