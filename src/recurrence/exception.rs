//! Per-date overrides to a recurrence pattern.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An override for a single generated occurrence date.
///
/// At most one exception exists per date (uniqueness is the storage layer's
/// concern). An exception either deletes the occurrence or moves it to the
/// date of a materialized replacement instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    /// The occurrence date this exception overrides. Date only; callers
    /// normalize any time-of-day component away before building exceptions.
    pub date: NaiveDate,
    /// Suppress the occurrence entirely.
    #[serde(default)]
    pub deleted: bool,
    /// Date of the replacement instance when the occurrence was moved.
    /// The caller resolves the replacement reference to its date.
    #[serde(default)]
    pub replacement_date: Option<NaiveDate>,
}

impl Exception {
    /// An exception that deletes the occurrence on `date`.
    #[must_use]
    pub const fn deletion(date: NaiveDate) -> Self {
        Self {
            date,
            deleted: true,
            replacement_date: None,
        }
    }

    /// An exception that moves the occurrence on `date` to `replacement`.
    #[must_use]
    pub const fn moved(date: NaiveDate, replacement: NaiveDate) -> Self {
        Self {
            date,
            deleted: false,
            replacement_date: Some(replacement),
        }
    }
}

/// Build a date-keyed lookup over a slice of exceptions.
///
/// Later entries win on duplicate dates, matching last-write-wins storage
/// semantics.
#[must_use]
pub fn exception_lookup(exceptions: &[Exception]) -> HashMap<NaiveDate, &Exception> {
    exceptions.iter().map(|e| (e.date, e)).collect()
}
