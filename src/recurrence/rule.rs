//! Recurrence rule definition and validation.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CadenceError;

/// How often a rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    /// Every `interval` days.
    Daily,
    /// Every `interval` weeks, optionally filtered to specific weekdays.
    Weekly,
    /// Every `interval` months on the anchor's day-of-month (clamped).
    Monthly,
    /// Every `interval` years on the anchor's month and day.
    Yearly,
}

impl RecurrenceKind {
    /// Parse a kind from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "day" | "d" => Some(Self::Daily),
            "weekly" | "week" | "w" => Some(Self::Weekly),
            "monthly" | "month" | "m" => Some(Self::Monthly),
            "yearly" | "year" | "y" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

impl std::fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A recurrence rule.
///
/// `window_start` is the anchor date: day-of-month, month/day, and weekday
/// spacing are all measured from it. `window_end = None` means the rule is
/// unbounded; expansion is then limited only by the requested range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Repeat frequency.
    pub kind: RecurrenceKind,
    /// Spacing multiplier (1 = every day/week/month/year).
    pub interval: u32,
    /// Weekday filter for weekly rules, Sunday = 0 through Saturday = 6.
    /// Ignored for other kinds; empty means "same weekday as the anchor".
    #[serde(default)]
    pub days_of_week: BTreeSet<u8>,
    /// Anchor date and inclusive lower bound for occurrences.
    pub window_start: NaiveDate,
    /// Inclusive upper bound, or `None` for an open-ended rule.
    #[serde(default)]
    pub window_end: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Create a rule with no weekday filter and no end bound.
    #[must_use]
    pub fn new(kind: RecurrenceKind, interval: u32, window_start: NaiveDate) -> Self {
        Self {
            kind,
            interval,
            days_of_week: BTreeSet::new(),
            window_start,
            window_end: None,
        }
    }

    /// Set the weekday filter.
    #[must_use]
    pub fn with_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.days_of_week = days.into_iter().collect();
        self
    }

    /// Set the end bound.
    #[must_use]
    pub const fn until(mut self, end: NaiveDate) -> Self {
        self.window_end = Some(end);
        self
    }

    /// Check structural validity without erroring.
    ///
    /// The expander uses this to return an empty result for malformed rules
    /// instead of looping or panicking.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.interval >= 1 && self.days_of_week.iter().all(|&d| d <= 6)
    }

    /// Validate the rule, for callers that prefer an error over silence.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::Parse` if the interval is zero or a weekday
    /// value is outside 0..=6.
    pub fn validate(&self) -> Result<(), CadenceError> {
        if self.interval < 1 {
            return Err(CadenceError::Parse(
                "Recurrence interval must be at least 1".to_string(),
            ));
        }
        if let Some(bad) = self.days_of_week.iter().find(|&&d| d > 6) {
            return Err(CadenceError::Parse(format!(
                "Invalid weekday value {bad} (expected 0-6, Sunday = 0)"
            )));
        }
        Ok(())
    }
}
