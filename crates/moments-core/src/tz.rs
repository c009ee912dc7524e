//! Timezone handling utilities.
//!
//! Parsing of IANA timezone names and conversion between UTC instants and
//! local wall-clock times, including resolution of local times that fall
//! into a DST gap.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{MomentsError, Result};

/// Upper bound, in minutes, for probing past a DST gap.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// # Examples
///
/// ```
/// use moments_core::tz::parse_tz;
///
/// let tz = parse_tz("Europe/Berlin").unwrap();
/// assert_eq!(tz.to_string(), "Europe/Berlin");
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| MomentsError::InvalidTimezone(name.to_string()))
}

/// Local wall-clock time of a UTC instant.
///
/// Returns `None` when the offset pushes the local time past the range
/// chrono can represent (within a day of `MIN_UTC` / `MAX_UTC`).
pub fn local_naive(utc: DateTime<Utc>, tz: Tz) -> Option<NaiveDateTime> {
    let naive = utc.naive_utc();
    naive.checked_add_offset(tz.offset_from_utc_datetime(&naive).fix())
}

/// Resolve a local wall-clock time to a UTC instant.
///
/// Ambiguous times (DST fall back) resolve to the earlier occurrence.
/// Nonexistent times (DST spring forward) resolve to the first valid local
/// time after the gap. Returns `None` only when no valid local time exists
/// within a day, which happens at the edge of the representable range.
pub fn resolve_local(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return Some(dt.with_timezone(&Utc));
    }

    (1..=MAX_GAP_MINUTES).find_map(|minutes| {
        let candidate = local.checked_add_signed(chrono::Duration::minutes(minutes))?;
        tz.from_local_datetime(&candidate)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Convert local midnight of `date` in `tz` to UTC.
///
/// In zones where midnight itself is skipped by a DST transition the first
/// valid instant of the day is returned instead.
pub fn local_midnight_to_utc(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    resolve_local(midnight, tz)
}

/// Format a UTC instant as RFC3339 local time with offset
/// (e.g. `2026-03-29T00:00:00+01:00`).
///
/// Returns `None` if the local time is not representable.
pub fn format_local(utc: DateTime<Utc>, tz: Tz) -> Option<String> {
    let offset = tz.offset_from_utc_datetime(&utc.naive_utc()).fix();
    let local = utc.naive_utc().checked_add_offset(offset)?;
    Some(format!("{}{}", local.format("%Y-%m-%dT%H:%M:%S"), offset))
}

/// Format a UTC datetime as RFC3339 with `Z` suffix
/// (e.g. `2026-03-28T23:00:00Z`).
pub fn format_rfc3339_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
