//! Calendar arithmetic helpers.
//!
//! Recurrence expansion needs a handful of operations chrono does not
//! provide directly: Sunday-based weekday numbering, month stepping with
//! day-of-month clamping, and week-start normalization. They all live here
//! so date handling stays consistent across the crate.

use chrono::{Datelike, Duration, NaiveDate};

/// Weekday index of a date with Sunday = 0 through Saturday = 6.
#[must_use]
pub fn weekday_index(date: NaiveDate) -> u8 {
    #[allow(clippy::cast_possible_truncation)]
    let idx = date.weekday().num_days_from_sunday() as u8;
    idx
}

/// Number of days in a given month.
///
/// `month` is 1-based. Returns 0 for an invalid month, which callers treat
/// as "no valid day" rather than panicking.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1);
    let first_of_this = NaiveDate::from_ymd_opt(year, month, 1);

    match (first_of_this, first_of_next) {
        (Some(a), Some(b)) => u32::try_from(b.signed_duration_since(a).num_days()).unwrap_or(0),
        _ => 0,
    }
}

/// The Sunday on or before the given date.
///
/// Used to align weekly recurrence to Sunday-started weeks.
#[must_use]
pub fn sunday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(weekday_index(date)))
}

/// Add `months` to a date, clamping the day-of-month to the target month's
/// length (e.g. Jan 31 + 1 month = Feb 28/29).
///
/// Returns `None` if the resulting year is outside chrono's supported range.
#[must_use]
pub fn add_months_clamped(date: NaiveDate, months: u32, anchor_day: u32) -> Option<NaiveDate> {
    let total = date.year() * 12 + i32::try_from(date.month0()).ok()? + i32::try_from(months).ok()?;
    let year = total.div_euclid(12);
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;

    let day = anchor_day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Add `years` to a date, clamping Feb 29 anchors to Feb 28 in common years.
#[must_use]
pub fn add_years_clamped(date: NaiveDate, years: u32, anchor_day: u32) -> Option<NaiveDate> {
    let year = date.year() + i32::try_from(years).ok()?;
    let day = anchor_day.min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekday_index_sunday_is_zero() {
        // 2026-02-01 is a Sunday
        assert_eq!(weekday_index(d(2026, 2, 1)), 0);
        assert_eq!(weekday_index(d(2026, 2, 2)), 1);
        assert_eq!(weekday_index(d(2026, 2, 7)), 6);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 1), 31);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2028, 2), 29);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
    }

    #[test]
    fn test_days_in_month_invalid() {
        assert_eq!(days_in_month(2026, 13), 0);
        assert_eq!(days_in_month(2026, 0), 0);
    }

    #[test]
    fn test_sunday_of_week() {
        assert_eq!(sunday_of_week(d(2026, 2, 1)), d(2026, 2, 1));
        assert_eq!(sunday_of_week(d(2026, 2, 4)), d(2026, 2, 1));
        assert_eq!(sunday_of_week(d(2026, 2, 7)), d(2026, 2, 1));
    }

    #[test]
    fn test_add_months_clamps_to_short_month() {
        assert_eq!(
            add_months_clamped(d(2026, 1, 31), 1, 31),
            Some(d(2026, 2, 28))
        );
        assert_eq!(
            add_months_clamped(d(2028, 1, 31), 1, 31),
            Some(d(2028, 2, 29))
        );
    }

    #[test]
    fn test_add_months_restores_anchor_day() {
        // Stepping from a clamped date with the original anchor recovers the 31st.
        assert_eq!(
            add_months_clamped(d(2026, 2, 28), 1, 31),
            Some(d(2026, 3, 31))
        );
    }

    #[test]
    fn test_add_months_crosses_year() {
        assert_eq!(
            add_months_clamped(d(2026, 11, 15), 3, 15),
            Some(d(2027, 2, 15))
        );
    }

    #[test]
    fn test_add_years_clamps_leap_day() {
        assert_eq!(add_years_clamped(d(2028, 2, 29), 1, 29), Some(d(2029, 2, 28)));
        assert_eq!(add_years_clamped(d(2028, 2, 29), 4, 29), Some(d(2032, 2, 29)));
    }
}
