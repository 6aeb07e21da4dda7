//! Occurrence-date generation for recurrence rules.
//!
//! `expand` is the single entry point: raw dates are generated from the
//! rule, then per-date exceptions are applied. Malformed input (zero
//! interval, out-of-range weekday, inverted range) yields an empty result
//! rather than an error, since there are no partial side effects to roll
//! back.

use chrono::{Duration, NaiveDate};

use crate::core::datetime::{add_months_clamped, add_years_clamped, sunday_of_week};

use super::exception::{exception_lookup, Exception};
use super::rule::{RecurrenceKind, RecurrenceRule};

/// Expand a rule into its effective occurrence dates within a range.
///
/// The generation window is the intersection of `[range_start, range_end]`
/// and the rule's own `[window_start, window_end]`. Exceptions are applied
/// only to dates the rule actually generated; an exception dated outside
/// the raw pattern is ignored here (it refers to history the caller has
/// already materialized elsewhere).
///
/// The result is ascending and duplicate-free.
#[must_use]
pub fn expand(
    rule: &RecurrenceRule,
    exceptions: &[Exception],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<NaiveDate> {
    if !rule.is_well_formed() || range_start > range_end {
        return Vec::new();
    }

    let effective_start = range_start.max(rule.window_start);
    let effective_end = rule
        .window_end
        .map_or(range_end, |we| we.min(range_end));

    if effective_start > effective_end {
        return Vec::new();
    }

    let raw = match rule.kind {
        RecurrenceKind::Daily => {
            stepped_days(rule.window_start, i64::from(rule.interval), effective_start, effective_end)
        }
        RecurrenceKind::Weekly => {
            if rule.days_of_week.is_empty() {
                stepped_days(
                    rule.window_start,
                    i64::from(rule.interval) * 7,
                    effective_start,
                    effective_end,
                )
            } else {
                weekly_filtered(rule, effective_start, effective_end)
            }
        }
        RecurrenceKind::Monthly => monthly(rule, effective_start, effective_end),
        RecurrenceKind::Yearly => yearly(rule, effective_start, effective_end),
    };

    apply_exceptions(raw, exceptions)
}

/// Dates at a fixed day spacing from the anchor, within the window.
fn stepped_days(
    anchor: NaiveDate,
    step_days: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    // First multiple of the step on or after the window start.
    let offset = start.signed_duration_since(anchor).num_days();
    let first_step = (offset + step_days - 1).div_euclid(step_days).max(0);

    let mut dates = Vec::new();
    let mut current = anchor + Duration::days(first_step * step_days);
    while current <= end {
        dates.push(current);
        current += Duration::days(step_days);
    }
    dates
}

/// Weekly rule with a weekday filter: for each week at interval-week
/// spacing from the anchor week, emit the matching weekdays in order.
fn weekly_filtered(rule: &RecurrenceRule, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let anchor_week = sunday_of_week(rule.window_start);
    let step_days = i64::from(rule.interval) * 7;

    // Skip whole intervals that end before the window; the per-date check
    // below trims the partial first week.
    let offset = sunday_of_week(start)
        .signed_duration_since(anchor_week)
        .num_days()
        .max(0);
    let mut week_start = anchor_week + Duration::days(offset.div_euclid(step_days) * step_days);

    let mut dates = Vec::new();
    while week_start <= end {
        for &day in &rule.days_of_week {
            let date = week_start + Duration::days(i64::from(day));
            if date >= start && date <= end {
                dates.push(date);
            }
        }
        week_start += Duration::days(step_days);
    }
    dates
}

/// Monthly rule: anchor day-of-month, clamped to each month's length.
fn monthly(rule: &RecurrenceRule, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    use chrono::Datelike;

    let anchor = rule.window_start;
    let anchor_day = anchor.day();
    let months_elapsed = (i64::from(start.year()) * 12 + i64::from(start.month0()))
        - (i64::from(anchor.year()) * 12 + i64::from(anchor.month0()));
    let mut step = u32::try_from(months_elapsed.max(0))
        .map_or(0, |m| m / rule.interval * rule.interval);

    let mut dates = Vec::new();
    while let Some(date) = add_months_clamped(anchor, step, anchor_day) {
        if date > end {
            break;
        }
        if date >= start {
            dates.push(date);
        }
        step += rule.interval;
    }
    dates
}

/// Yearly rule: anchor month and day, with Feb 29 clamped in common years.
fn yearly(rule: &RecurrenceRule, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    use chrono::Datelike;

    let anchor = rule.window_start;
    let years_elapsed = start.year() - anchor.year();
    let mut step = u32::try_from(years_elapsed.max(0))
        .map_or(0, |y| y / rule.interval * rule.interval);

    let mut dates = Vec::new();
    while let Some(date) = add_years_clamped(anchor, step, anchor.day()) {
        if date > end {
            break;
        }
        if date >= start {
            dates.push(date);
        }
        step += rule.interval;
    }
    dates
}

/// Apply deletions and moves to the raw generated dates.
///
/// Only dates present in the raw set consult the lookup. Replacement dates
/// are deduplicated against dates already in the result.
fn apply_exceptions(raw: Vec<NaiveDate>, exceptions: &[Exception]) -> Vec<NaiveDate> {
    if exceptions.is_empty() {
        return raw;
    }

    let lookup = exception_lookup(exceptions);
    let mut dates = Vec::with_capacity(raw.len());
    let mut replacements = Vec::new();

    for date in raw {
        match lookup.get(&date) {
            Some(e) if e.deleted => {}
            Some(e) => {
                if let Some(replacement) = e.replacement_date {
                    replacements.push(replacement);
                } else {
                    // Exception row with neither flag set; occurrence stands.
                    dates.push(date);
                }
            }
            None => dates.push(date),
        }
    }

    for replacement in replacements {
        if !dates.contains(&replacement) {
            dates.push(replacement);
        }
    }

    dates.sort_unstable();
    dates.dedup();
    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn daily(interval: u32, anchor: NaiveDate) -> RecurrenceRule {
        RecurrenceRule::new(RecurrenceKind::Daily, interval, anchor)
    }

    #[test]
    fn test_daily_every_day() {
        let rule = daily(1, d(2026, 2, 1));
        let dates = expand(&rule, &[], d(2026, 2, 1), d(2026, 2, 5));
        assert_eq!(
            dates,
            vec![d(2026, 2, 1), d(2026, 2, 2), d(2026, 2, 3), d(2026, 2, 4), d(2026, 2, 5)]
        );
    }

    #[test]
    fn test_daily_interval_alignment() {
        // Anchor Feb 1, every 3 days; a range starting mid-pattern must stay
        // phase-aligned with the anchor.
        let rule = daily(3, d(2026, 2, 1));
        let dates = expand(&rule, &[], d(2026, 2, 3), d(2026, 2, 14));
        assert_eq!(dates, vec![d(2026, 2, 4), d(2026, 2, 7), d(2026, 2, 10), d(2026, 2, 13)]);

        for date in &dates {
            let days = date.signed_duration_since(d(2026, 2, 1)).num_days();
            assert_eq!(days % 3, 0);
        }
    }

    #[test]
    fn test_daily_respects_rule_window() {
        let rule = daily(1, d(2026, 2, 3)).until(d(2026, 2, 10));
        let dates = expand(&rule, &[], d(2026, 1, 1), d(2026, 3, 1));
        assert_eq!(dates.first(), Some(&d(2026, 2, 3)));
        assert_eq!(dates.last(), Some(&d(2026, 2, 10)));
        assert_eq!(dates.len(), 8);
    }

    #[test]
    fn test_weekly_without_filter_steps_whole_weeks() {
        // 2026-02-04 is a Wednesday; every 2 weeks.
        let rule = RecurrenceRule::new(RecurrenceKind::Weekly, 2, d(2026, 2, 4));
        let dates = expand(&rule, &[], d(2026, 2, 1), d(2026, 3, 31));
        assert_eq!(dates, vec![d(2026, 2, 4), d(2026, 2, 18), d(2026, 3, 4), d(2026, 3, 18)]);
    }

    #[test]
    fn test_weekly_filter_includes_sunday_zero() {
        // Anchor Sunday 2026-02-01; Sundays and Wednesdays.
        let rule =
            RecurrenceRule::new(RecurrenceKind::Weekly, 1, d(2026, 2, 1)).with_days([0, 3]);
        let dates = expand(&rule, &[], d(2026, 2, 1), d(2026, 2, 14));
        assert_eq!(
            dates,
            vec![d(2026, 2, 1), d(2026, 2, 4), d(2026, 2, 8), d(2026, 2, 11)]
        );
    }

    #[test]
    fn test_weekly_filter_weekday_property() {
        use crate::core::datetime::weekday_index;

        let rule =
            RecurrenceRule::new(RecurrenceKind::Weekly, 2, d(2026, 1, 5)).with_days([1, 5]);
        let dates = expand(&rule, &[], d(2026, 1, 1), d(2026, 3, 31));
        assert!(!dates.is_empty());
        for date in dates {
            assert!([1u8, 5u8].contains(&weekday_index(date)));
        }
    }

    #[test]
    fn test_weekly_filter_skips_partial_first_week() {
        // Anchor Wednesday 2026-02-04 with Sunday+Monday selected: the
        // Sunday and Monday of the anchor week precede the window start and
        // must not appear.
        let rule =
            RecurrenceRule::new(RecurrenceKind::Weekly, 1, d(2026, 2, 4)).with_days([0, 1]);
        let dates = expand(&rule, &[], d(2026, 2, 1), d(2026, 2, 10));
        assert_eq!(dates, vec![d(2026, 2, 8), d(2026, 2, 9)]);
    }

    #[test]
    fn test_monthly_clamps_to_short_months() {
        // Anchored on Jan 31; Feb 2026 has 28 days.
        let rule = RecurrenceRule::new(RecurrenceKind::Monthly, 1, d(2026, 1, 31));
        let dates = expand(&rule, &[], d(2026, 1, 1), d(2026, 4, 1));
        assert_eq!(dates, vec![d(2026, 1, 31), d(2026, 2, 28), d(2026, 3, 31)]);
    }

    #[test]
    fn test_monthly_clamp_does_not_drift() {
        // April resumes on the 30th, not the 28th carried from February.
        let rule = RecurrenceRule::new(RecurrenceKind::Monthly, 1, d(2026, 1, 31));
        let dates = expand(&rule, &[], d(2026, 4, 1), d(2026, 5, 31));
        assert_eq!(dates, vec![d(2026, 4, 30), d(2026, 5, 31)]);
    }

    #[test]
    fn test_monthly_interval_spacing() {
        let rule = RecurrenceRule::new(RecurrenceKind::Monthly, 3, d(2026, 1, 15));
        let dates = expand(&rule, &[], d(2026, 1, 1), d(2026, 12, 31));
        assert_eq!(
            dates,
            vec![d(2026, 1, 15), d(2026, 4, 15), d(2026, 7, 15), d(2026, 10, 15)]
        );
    }

    #[test]
    fn test_yearly_same_month_day() {
        let rule = RecurrenceRule::new(RecurrenceKind::Yearly, 1, d(2026, 3, 14));
        let dates = expand(&rule, &[], d(2026, 1, 1), d(2028, 12, 31));
        assert_eq!(dates, vec![d(2026, 3, 14), d(2027, 3, 14), d(2028, 3, 14)]);
    }

    #[test]
    fn test_yearly_leap_day_clamps() {
        let rule = RecurrenceRule::new(RecurrenceKind::Yearly, 1, d(2028, 2, 29));
        let dates = expand(&rule, &[], d(2028, 1, 1), d(2030, 12, 31));
        assert_eq!(dates, vec![d(2028, 2, 29), d(2029, 2, 28), d(2030, 2, 28)]);
    }

    #[test]
    fn test_exception_deletion_suppresses_date() {
        let rule = daily(1, d(2026, 2, 1)).until(d(2026, 2, 5));
        let exceptions = vec![Exception::deletion(d(2026, 2, 3))];
        let dates = expand(&rule, &exceptions, d(2026, 2, 1), d(2026, 2, 5));
        assert_eq!(
            dates,
            vec![d(2026, 2, 1), d(2026, 2, 2), d(2026, 2, 4), d(2026, 2, 5)]
        );
    }

    #[test]
    fn test_exception_replacement_moves_date() {
        let rule = daily(1, d(2026, 2, 1)).until(d(2026, 2, 7));
        let exceptions = vec![Exception::moved(d(2026, 2, 3), d(2026, 2, 6))];
        let dates = expand(&rule, &exceptions, d(2026, 2, 1), d(2026, 2, 7));
        assert_eq!(
            dates,
            vec![
                d(2026, 2, 1),
                d(2026, 2, 2),
                d(2026, 2, 4),
                d(2026, 2, 5),
                d(2026, 2, 6),
                d(2026, 2, 7)
            ]
        );
    }

    #[test]
    fn test_replacement_deduplicates_against_generated() {
        // Moving Feb 3 onto Feb 4, which the rule already produces.
        let rule = daily(1, d(2026, 2, 1)).until(d(2026, 2, 5));
        let exceptions = vec![Exception::moved(d(2026, 2, 3), d(2026, 2, 4))];
        let dates = expand(&rule, &exceptions, d(2026, 2, 1), d(2026, 2, 5));
        assert_eq!(
            dates,
            vec![d(2026, 2, 1), d(2026, 2, 2), d(2026, 2, 4), d(2026, 2, 5)]
        );
    }

    #[test]
    fn test_ignores_exception_outside_pattern() {
        // Every 2 days from Feb 1: Feb 2 is never generated, so an
        // exception on it has no effect. Intentional boundary.
        let rule = daily(2, d(2026, 2, 1));
        let exceptions = vec![Exception::moved(d(2026, 2, 2), d(2026, 2, 20))];
        let dates = expand(&rule, &exceptions, d(2026, 2, 1), d(2026, 2, 7));
        assert_eq!(
            dates,
            vec![d(2026, 2, 1), d(2026, 2, 3), d(2026, 2, 5), d(2026, 2, 7)]
        );
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let rule = daily(1, d(2026, 2, 1));
        assert!(expand(&rule, &[], d(2026, 2, 5), d(2026, 2, 1)).is_empty());
    }

    #[test]
    fn test_zero_interval_is_empty() {
        let rule = daily(0, d(2026, 2, 1));
        assert!(expand(&rule, &[], d(2026, 2, 1), d(2026, 2, 28)).is_empty());
    }

    #[test]
    fn test_bad_weekday_is_empty() {
        let rule =
            RecurrenceRule::new(RecurrenceKind::Weekly, 1, d(2026, 2, 1)).with_days([0, 9]);
        assert!(expand(&rule, &[], d(2026, 2, 1), d(2026, 2, 28)).is_empty());
    }

    #[test]
    fn test_disjoint_windows_are_empty() {
        let rule = daily(1, d(2026, 2, 1)).until(d(2026, 2, 10));
        assert!(expand(&rule, &[], d(2026, 3, 1), d(2026, 3, 31)).is_empty());
    }

    #[test]
    fn test_range_before_anchor_is_empty() {
        let rule = daily(1, d(2026, 2, 1));
        assert!(expand(&rule, &[], d(2026, 1, 1), d(2026, 1, 31)).is_empty());
    }

    #[test]
    fn test_result_is_sorted_and_unique() {
        let rule = RecurrenceRule::new(RecurrenceKind::Weekly, 1, d(2026, 2, 1))
            .with_days([0, 2, 4, 6]);
        // Two occurrences moved onto the same date must collapse to one.
        let exceptions = vec![
            Exception::moved(d(2026, 2, 5), d(2026, 2, 2)),
            Exception::moved(d(2026, 2, 12), d(2026, 2, 2)),
        ];
        let dates = expand(&rule, &exceptions, d(2026, 2, 1), d(2026, 2, 21));

        let mut sorted = dates.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(dates, sorted);
        assert_eq!(dates.iter().filter(|&&x| x == d(2026, 2, 2)).count(), 1);
    }
}
