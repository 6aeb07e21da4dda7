//! JSON output formatting for cadence.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::error::CadenceError;
use crate::focus::{FocusSession, NextSession};

/// Serialize any value as pretty-printed JSON.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, CadenceError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format occurrence dates as JSON.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if serialization fails.
pub fn format_dates_json(dates: &[NaiveDate]) -> Result<String, CadenceError> {
    let output = json!({
        "count": dates.len(),
        "dates": dates,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a session list as JSON.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if serialization fails.
pub fn format_sessions_json(sessions: &[FocusSession]) -> Result<String, CadenceError> {
    let output = json!({
        "count": sessions.len(),
        "sessions": sessions,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a cycle prediction as JSON.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if serialization fails.
pub fn format_next_json(next: &NextSession, auto_start: bool) -> Result<String, CadenceError> {
    let output = json!({
        "type": next.session_type,
        "sequence_number": next.sequence_number,
        "duration_seconds": next.duration_seconds,
        "auto_start": auto_start,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
