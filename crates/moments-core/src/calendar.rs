//! Calendar normalization.
//!
//! Maps arbitrary instants to the start of their containing hour, day,
//! week, month or year in a configured timezone. Weeks always start on
//! Monday (ISO 8601) whatever the locale.
//!
//! Boundaries are computed on local calendar dates and each one is
//! converted back to UTC independently, so DST days come out as 23 or 25
//! hours long and months keep their real lengths.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use tracing::warn;

use crate::models::BucketType;
use crate::tz::{local_midnight_to_utc, local_naive};

/// Returns `true` for proleptic-Gregorian leap years.
///
/// ```
/// use moments_core::calendar::is_leap_year;
///
/// assert!(is_leap_year(2024));
/// assert!(!is_leap_year(1900));
/// ```
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of calendar days in `year`.
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Days to step back from `weekday` to reach the Monday that starts its week.
pub fn days_since_monday(weekday: Weekday) -> u64 {
    match weekday {
        Weekday::Mon => 0,
        Weekday::Tue => 1,
        Weekday::Wed => 2,
        Weekday::Thu => 3,
        Weekday::Fri => 4,
        Weekday::Sat => 5,
        Weekday::Sun => 6,
    }
}

/// Period arithmetic anchored to a single timezone.
///
/// Every `start_of_*` method falls back to returning its input unchanged
/// (and logs a warning) when the underlying calendar cannot represent the
/// requested boundary. That only happens at the edges of chrono's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

impl Calendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The timezone all boundaries are computed in.
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Local calendar date of `instant`, or `None` if the local time falls
    /// outside chrono's range.
    pub fn local_date(&self, instant: DateTime<Utc>) -> Option<NaiveDate> {
        local_naive(instant, self.tz).map(|local| local.date())
    }

    /// Local weekday of `instant`.
    pub fn weekday(&self, instant: DateTime<Utc>) -> Option<Weekday> {
        self.local_date(instant).map(|date| date.weekday())
    }

    /// First instant of the local calendar day `date`.
    pub fn day_start(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        local_midnight_to_utc(date, self.tz)
    }

    /// Truncate to the hour boundary in local time.
    pub fn start_of_hour(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let start = local_naive(instant, self.tz).and_then(|local| {
            let elapsed = chrono::Duration::seconds(i64::from(local.minute() * 60 + local.second()))
                + chrono::Duration::nanoseconds(i64::from(local.nanosecond() % 1_000_000_000));
            instant.checked_sub_signed(elapsed)
        });
        self.or_input(instant, BucketType::Hour, start)
    }

    /// Truncate to local midnight.
    pub fn start_of_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let start = self
            .local_date(instant)
            .and_then(|date| self.day_start(date));
        self.or_input(instant, BucketType::Day, start)
    }

    /// Midnight of the Monday at or before the instant's local day.
    pub fn start_of_week(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let start = self
            .local_date(instant)
            .and_then(|date| date.checked_sub_days(Days::new(days_since_monday(date.weekday()))))
            .and_then(|monday| self.day_start(monday));
        self.or_input(instant, BucketType::Week, start)
    }

    /// Midnight of the first day of the instant's local month.
    pub fn start_of_month(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let start = self
            .local_date(instant)
            .and_then(|date| NaiveDate::from_ymd_opt(date.year(), date.month(), 1))
            .and_then(|first| self.day_start(first));
        self.or_input(instant, BucketType::Month, start)
    }

    /// Midnight of January 1st of the instant's local year.
    pub fn start_of_year(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let start = self
            .local_date(instant)
            .and_then(|date| NaiveDate::from_ymd_opt(date.year(), 1, 1))
            .and_then(|first| self.day_start(first));
        self.or_input(instant, BucketType::Year, start)
    }

    /// Normalize `instant` to the start of its period for `bucket_type`.
    pub fn normalize(&self, instant: DateTime<Utc>, bucket_type: BucketType) -> DateTime<Utc> {
        match bucket_type {
            BucketType::Hour => self.start_of_hour(instant),
            BucketType::Day => self.start_of_day(instant),
            BucketType::Week => self.start_of_week(instant),
            BucketType::Month => self.start_of_month(instant),
            BucketType::Year => self.start_of_year(instant),
        }
    }

    /// Start of the period following the one that begins at `start`.
    ///
    /// Day and longer periods step on local calendar dates rather than by a
    /// fixed duration. Returns `None` if the next boundary is not
    /// representable.
    pub fn add_period(
        &self,
        start: DateTime<Utc>,
        bucket_type: BucketType,
    ) -> Option<DateTime<Utc>> {
        let next = match bucket_type {
            BucketType::Hour => return start.checked_add_signed(chrono::Duration::hours(1)),
            BucketType::Day => self.local_date(start)?.checked_add_days(Days::new(1)),
            BucketType::Week => self.local_date(start)?.checked_add_days(Days::new(7)),
            BucketType::Month => self.local_date(start)?.checked_add_months(Months::new(1)),
            BucketType::Year => self.local_date(start)?.checked_add_months(Months::new(12)),
        }?;
        self.day_start(next)
    }

    fn or_input(
        &self,
        instant: DateTime<Utc>,
        bucket_type: BucketType,
        start: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        start.unwrap_or_else(|| {
            warn!(
                %instant,
                %bucket_type,
                tz = %self.tz,
                "calendar cannot normalize instant, returning it unchanged"
            );
            instant
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tz::parse_tz;
    use chrono::TimeZone;

    const ALL_TYPES: [BucketType; 5] = [
        BucketType::Hour,
        BucketType::Day,
        BucketType::Week,
        BucketType::Month,
        BucketType::Year,
    ];

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).single().unwrap()
    }

    fn calendars() -> Vec<Calendar> {
        [
            "UTC",
            "Europe/Berlin",
            "America/New_York",
            "Asia/Kolkata",
            "America/Sao_Paulo",
            "Pacific/Auckland",
        ]
        .iter()
        .map(|name| Calendar::new(parse_tz(name).unwrap()))
        .collect()
    }

    #[test]
    fn leap_year_table() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2023), 365);
    }

    #[test]
    fn days_since_monday_table() {
        let expected = [
            (Weekday::Mon, 0),
            (Weekday::Tue, 1),
            (Weekday::Wed, 2),
            (Weekday::Thu, 3),
            (Weekday::Fri, 4),
            (Weekday::Sat, 5),
            (Weekday::Sun, 6),
        ];
        for (weekday, back) in expected {
            assert_eq!(days_since_monday(weekday), back, "{weekday}");
        }
    }

    #[test]
    fn week_start_from_wednesday() {
        let calendar = Calendar::default();
        let start = calendar.start_of_week(utc(2024, 1, 3, 14, 30, 0));
        assert_eq!(start, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn week_start_from_late_sunday() {
        let calendar = Calendar::default();
        let start = calendar.start_of_week(utc(2024, 1, 7, 23, 59, 0));
        assert_eq!(start, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn week_start_uses_local_weekday() {
        // Sunday 23:30 UTC is already Monday 00:30 in Berlin.
        let calendar = Calendar::new(parse_tz("Europe/Berlin").unwrap());
        let start = calendar.start_of_week(utc(2024, 1, 7, 23, 30, 0));
        assert_eq!(start, utc(2024, 1, 7, 23, 0, 0));
    }

    #[test]
    fn hour_start_with_half_hour_offset() {
        // 14:50 UTC is 20:20 in Kolkata (+05:30); the hour starts at 20:00 local.
        let calendar = Calendar::new(parse_tz("Asia/Kolkata").unwrap());
        let start = calendar.start_of_hour(utc(2024, 5, 10, 14, 50, 12));
        assert_eq!(start, utc(2024, 5, 10, 14, 30, 0));
    }

    #[test]
    fn month_and_year_starts() {
        let calendar = Calendar::new(parse_tz("Europe/Berlin").unwrap());
        let instant = utc(2024, 7, 19, 8, 0, 0);

        assert_eq!(calendar.start_of_month(instant), utc(2024, 6, 30, 22, 0, 0));
        assert_eq!(calendar.start_of_year(instant), utc(2023, 12, 31, 23, 0, 0));
    }

    #[test]
    fn day_start_on_spring_forward() {
        let calendar = Calendar::new(parse_tz("Europe/Berlin").unwrap());
        let start = calendar.start_of_day(utc(2026, 3, 29, 12, 0, 0));
        let end = calendar.add_period(start, BucketType::Day).unwrap();

        assert_eq!(start, utc(2026, 3, 28, 23, 0, 0));
        assert_eq!(end - start, chrono::Duration::hours(23));
    }

    #[test]
    fn add_period_follows_month_lengths() {
        let calendar = Calendar::default();
        let feb = utc(2024, 2, 1, 0, 0, 0);
        let mar = calendar.add_period(feb, BucketType::Month).unwrap();
        let next_year = calendar.add_period(feb, BucketType::Year).unwrap();

        assert_eq!(mar, utc(2024, 3, 1, 0, 0, 0));
        assert_eq!(mar - feb, chrono::Duration::days(29));
        assert_eq!(next_year, utc(2025, 2, 1, 0, 0, 0));
    }

    #[test]
    fn normalization_is_idempotent() {
        let step = chrono::Duration::minutes(433);
        for calendar in calendars() {
            let mut instant = utc(2023, 12, 20, 3, 17, 41);
            for _ in 0..1_200 {
                for bucket_type in ALL_TYPES {
                    let once = calendar.normalize(instant, bucket_type);
                    let twice = calendar.normalize(once, bucket_type);
                    assert_eq!(once, twice, "{bucket_type} {instant} in {}", calendar.tz());
                    assert!(once <= instant);
                }
                instant += step;
            }
        }
    }

    #[test]
    fn week_start_is_always_monday() {
        let step = chrono::Duration::minutes(611);
        for calendar in calendars() {
            let mut instant = utc(2024, 2, 25, 0, 0, 0);
            for _ in 0..600 {
                let start = calendar.start_of_week(instant);
                assert_eq!(calendar.weekday(start), Some(Weekday::Mon), "{instant}");
                assert!(instant - start < chrono::Duration::days(7) + chrono::Duration::hours(1));
                instant += step;
            }
        }
    }

    #[test]
    fn range_edges_return_input_unchanged() {
        let tokyo = Calendar::new(parse_tz("Asia/Tokyo").unwrap());
        let new_york = Calendar::new(parse_tz("America/New_York").unwrap());
        let max = DateTime::<Utc>::MAX_UTC;
        let min = DateTime::<Utc>::MIN_UTC;

        assert_eq!(tokyo.local_date(max), None);
        assert_eq!(tokyo.weekday(max), None);
        assert_eq!(new_york.local_date(min), None);
        for bucket_type in ALL_TYPES {
            assert_eq!(tokyo.normalize(max, bucket_type), max, "{bucket_type}");
            assert_eq!(new_york.normalize(min, bucket_type), min, "{bucket_type}");
        }
    }

    #[test]
    fn hour_start_when_local_time_overflows() {
        // 8210298412799 s is the last whole second chrono represents; Tokyo's
        // local clock is already past it.
        let tokyo = Calendar::new(parse_tz("Asia/Tokyo").unwrap());
        let instant = DateTime::<Utc>::from_timestamp(8_210_298_412_799, 0).unwrap();

        assert_eq!(tokyo.start_of_hour(instant), instant);
        assert_eq!(tokyo.start_of_day(instant), instant);
    }

    #[test]
    fn add_period_past_range_is_none() {
        let tokyo = Calendar::new(parse_tz("Asia/Tokyo").unwrap());
        let max = DateTime::<Utc>::MAX_UTC;

        assert_eq!(tokyo.add_period(max, BucketType::Day), None);
        assert_eq!(tokyo.add_period(max, BucketType::Hour), None);
        assert_eq!(Calendar::default().add_period(max, BucketType::Year), None);
    }
}
