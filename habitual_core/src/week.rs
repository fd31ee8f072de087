//! ISO-8601 week identifiers.
//!
//! Weeks run Monday to Sunday and week 1 of a year is the week containing
//! January 4th. A year has 52 or 53 weeks, so the dates around New Year can
//! belong to the neighbouring ISO year.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt;

/// An ISO `(year, week)` pair
///
/// Stored as the week's Monday, so every value names a week that exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekId {
    monday: NaiveDate,
}

impl WeekId {
    /// ISO week that contains `date`
    pub fn of(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday();
        Self {
            monday: date - Duration::days(i64::from(offset)),
        }
    }

    /// Week `week` of ISO year `year`, or `None` if that year has no such week
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|monday| Self { monday })
    }

    pub fn year(self) -> i32 {
        self.monday.iso_week().year()
    }

    pub fn week(self) -> u32 {
        self.monday.iso_week().week()
    }

    /// Monday of this week
    pub fn monday(self) -> NaiveDate {
        self.monday
    }

    /// The week immediately after this one
    pub fn next(self) -> Self {
        Self {
            monday: self.monday + Duration::days(7),
        }
    }

    /// The week immediately before this one
    pub fn prev(self) -> Self {
        Self {
            monday: self.monday - Duration::days(7),
        }
    }

    /// True if this week comes right after `other`
    pub fn follows(self, other: WeekId) -> bool {
        other.next() == self
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year(), self.week())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn w(year: i32, week: u32) -> WeekId {
        WeekId::new(year, week).unwrap()
    }

    #[test]
    fn test_mid_year_week() {
        // Monday and Sunday of the same week
        assert_eq!(WeekId::of(d(2024, 6, 10)), w(2024, 24));
        assert_eq!(WeekId::of(d(2024, 6, 16)), w(2024, 24));
        assert_eq!(WeekId::of(d(2024, 6, 17)), w(2024, 25));
    }

    #[test]
    fn test_january_fourth_is_always_week_one() {
        for year in 1990..2040 {
            assert_eq!(WeekId::of(d(year, 1, 4)), w(year, 1), "year {}", year);
        }
    }

    #[test]
    fn test_early_january_in_previous_iso_year() {
        // 2021-01-01 is a Friday, so it belongs to the last week of 2020
        assert_eq!(WeekId::of(d(2021, 1, 1)), w(2020, 53));
        assert_eq!(WeekId::of(d(2021, 1, 3)), w(2020, 53));
        assert_eq!(WeekId::of(d(2021, 1, 4)), w(2021, 1));
        // 2023-01-01 is a Sunday
        assert_eq!(WeekId::of(d(2023, 1, 1)), w(2022, 52));
    }

    #[test]
    fn test_late_december_in_next_iso_year() {
        // 2024-12-30 is a Monday whose Thursday is 2025-01-02
        assert_eq!(WeekId::of(d(2024, 12, 30)), w(2025, 1));
        assert_eq!(WeekId::of(d(2024, 12, 29)), w(2024, 52));
        assert_eq!(WeekId::of(d(2019, 12, 31)), w(2020, 1));
    }

    #[test]
    fn test_fifty_three_week_years() {
        assert_eq!(WeekId::of(d(2020, 12, 31)), w(2020, 53));
        assert_eq!(WeekId::of(d(2026, 12, 31)), w(2026, 53));
        assert_eq!(WeekId::of(d(2027, 1, 1)), w(2026, 53));
        assert_eq!(WeekId::of(d(2015, 12, 31)), w(2015, 53));
    }

    #[test]
    fn test_next_rolls_over_years() {
        assert_eq!(w(2024, 52).next(), w(2025, 1));
        assert_eq!(w(2020, 52).next(), w(2020, 53));
        assert_eq!(w(2020, 53).next(), w(2021, 1));
        assert_eq!(w(2024, 10).next(), w(2024, 11));
    }

    #[test]
    fn test_prev_rolls_over_years() {
        assert_eq!(w(2025, 1).prev(), w(2024, 52));
        assert_eq!(w(2021, 1).prev(), w(2020, 53));
        assert_eq!(w(2024, 11).prev(), w(2024, 10));
    }

    #[test]
    fn test_follows() {
        assert!(w(2021, 1).follows(w(2020, 53)));
        assert!(!w(2021, 1).follows(w(2020, 52)));
        assert!(!w(2024, 5).follows(w(2024, 5)));
    }

    #[test]
    fn test_monday() {
        assert_eq!(w(2025, 1).monday(), d(2024, 12, 30));
        assert_eq!(w(2020, 53).monday(), d(2020, 12, 28));
    }

    #[test]
    fn test_new_rejects_missing_weeks() {
        assert!(WeekId::new(2024, 60).is_none());
        assert!(WeekId::new(2024, 0).is_none());
        // 2024 has 52 ISO weeks, 2020 has 53
        assert!(WeekId::new(2024, 53).is_none());
        assert_eq!(WeekId::new(2020, 53).map(WeekId::monday), Some(d(2020, 12, 28)));
    }

    #[test]
    fn test_year_and_week_accessors() {
        let week = WeekId::of(d(2021, 1, 2));
        assert_eq!(week.year(), 2020);
        assert_eq!(week.week(), 53);
    }

    #[test]
    fn test_display() {
        assert_eq!(w(2024, 1).to_string(), "2024-W01");
        assert_eq!(w(2020, 53).to_string(), "2020-W53");
    }
}
