//! Output formatting for cadence.
//!
//! Formatters for occurrence dates and focus sessions, in pretty
//! (colored, human-readable) and JSON flavors.

mod json;
mod pretty;

use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::args::OutputFormat;
use crate::error::CadenceError;
use crate::focus::{FocusSession, NextSession, PomodoroSuggestion};

pub use json::*;
pub use pretty::*;

/// Format a list of occurrence dates.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_dates(dates: &[NaiveDate], format: OutputFormat) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_dates_pretty(dates)),
        OutputFormat::Json => format_dates_json(dates),
    }
}

/// Format a single session.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_session(
    session: &FocusSession,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session, now)),
        OutputFormat::Json => to_json(session),
    }
}

/// Format a session history list.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[FocusSession],
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions)),
        OutputFormat::Json => format_sessions_json(sessions),
    }
}

/// Format a cycle prediction.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_next(
    next: &NextSession,
    auto_start: bool,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_next_pretty(next, auto_start)),
        OutputFormat::Json => format_next_json(next, auto_start),
    }
}

/// Format a Pomodoro layout suggestion.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_suggestion(
    suggestion: &PomodoroSuggestion,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_suggestion_pretty(suggestion)),
        OutputFormat::Json => to_json(suggestion),
    }
}
