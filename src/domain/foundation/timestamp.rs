//! Timestamp value object for immutable points in time.
//!
//! Besides ordering and arithmetic, the governance engine works in calendar
//! months (budgets, penalties, break coverage), so month boundaries live here.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// Only the outer driver reads the clock; domain logic takes `now` as input.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp at midnight UTC on the given date.
    ///
    /// Returns `None` for dates that do not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|n| Self(n.and_utc()))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp offset by the given duration.
    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }

    /// Creates a new timestamp moved back by the given duration.
    pub fn minus(&self, duration: Duration) -> Self {
        Self(self.0 - duration)
    }

    /// Creates a new timestamp by adding the specified number of hours.
    pub fn add_hours(&self, hours: i64) -> Self {
        self.plus(Duration::hours(hours))
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        self.plus(Duration::days(days))
    }

    /// Returns midnight UTC on the first day of this timestamp's month.
    pub fn month_start(&self) -> Self {
        Self(first_of_month(self.0.year(), self.0.month()))
    }

    /// Returns midnight UTC on the first day of the following month.
    pub fn next_month_start(&self) -> Self {
        let (year, month) = if self.0.month() == 12 {
            (self.0.year() + 1, 1)
        } else {
            (self.0.year(), self.0.month() + 1)
        };
        Self(first_of_month(year, month))
    }

    /// Returns midnight UTC on the first day of the preceding month.
    pub fn previous_month_start(&self) -> Self {
        self.month_start().minus(Duration::milliseconds(1)).month_start()
    }

    /// Returns the number of hours in this timestamp's month.
    pub fn hours_in_month(&self) -> i64 {
        self.next_month_start()
            .duration_since(&self.month_start())
            .num_hours()
    }
}

fn first_of_month(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(year: i32, month: u32, day: u32) -> Timestamp {
        Timestamp::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn ordering_helpers_agree() {
        let earlier = ts(2024, 4, 1);
        let later = earlier.add_hours(1);
        assert!(earlier.is_before(&later));
        assert!(later.is_after(&earlier));
        assert_eq!(later.duration_since(&earlier), Duration::hours(1));
    }

    #[test]
    fn month_start_truncates_to_first_midnight() {
        let mid = ts(2024, 4, 17).add_hours(13);
        assert_eq!(mid.month_start(), ts(2024, 4, 1));
    }

    #[test]
    fn next_month_start_rolls_over_year() {
        assert_eq!(ts(2023, 12, 31).next_month_start(), ts(2024, 1, 1));
        assert_eq!(ts(2024, 4, 30).next_month_start(), ts(2024, 5, 1));
    }

    #[test]
    fn previous_month_start_rolls_back_year() {
        assert_eq!(ts(2024, 1, 10).previous_month_start(), ts(2023, 12, 1));
        assert_eq!(ts(2024, 3, 1).previous_month_start(), ts(2024, 2, 1));
    }

    #[test]
    fn hours_in_month_handles_lengths() {
        assert_eq!(ts(2024, 4, 5).hours_in_month(), 720);
        assert_eq!(ts(2024, 2, 5).hours_in_month(), 696);
        assert_eq!(ts(2023, 2, 5).hours_in_month(), 672);
        assert_eq!(ts(2024, 1, 5).hours_in_month(), 744);
    }

    #[test]
    fn from_ymd_rejects_invalid_date() {
        assert!(Timestamp::from_ymd(2023, 2, 30).is_none());
    }

    #[test]
    fn timestamp_serializes_transparently() {
        let t = ts(2024, 4, 1);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.starts_with("\"2024-04-01T00:00:00"));
    }
}
