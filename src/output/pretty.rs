//! Human-readable colored output.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use colored::Colorize;

use crate::focus::{format_duration, FocusSession, NextSession, PomodoroSuggestion, SessionState};

/// Format occurrence dates, one per line with weekday names.
#[must_use]
pub fn format_dates_pretty(dates: &[NaiveDate]) -> String {
    if dates.is_empty() {
        return "No occurrences in range".dimmed().to_string();
    }

    let mut lines = Vec::with_capacity(dates.len() + 1);
    lines.push(format!("{} occurrence(s):", dates.len()).bold().to_string());
    for date in dates {
        lines.push(format!("  {} ({})", date, date.format("%A")));
    }
    lines.join("\n")
}

/// Format a single session's status line.
#[must_use]
pub fn format_session_pretty(session: &FocusSession, now: DateTime<Utc>) -> String {
    let status = session.format_status(now);
    match session.state() {
        SessionState::InProgress => format!("⏱  {status}"),
        SessionState::Completed => format!("✓  {}", status.green()),
        SessionState::Abandoned => format!("✗  {}", status.dimmed()),
    }
}

/// Format a session history list, newest first.
#[must_use]
pub fn format_sessions_pretty(sessions: &[FocusSession]) -> String {
    if sessions.is_empty() {
        return "No sessions recorded".dimmed().to_string();
    }

    let mut lines = Vec::with_capacity(sessions.len());
    for session in sessions {
        let marker = match session.state() {
            SessionState::InProgress => "⏱".to_string(),
            SessionState::Completed => "✓".green().to_string(),
            SessionState::Abandoned => "✗".dimmed().to_string(),
        };
        let task = session
            .task_ref
            .as_ref()
            .map_or_else(String::new, |t| format!(" on \"{t}\""));
        lines.push(format!(
            "{} {} #{}{} - started {}",
            marker,
            session.session_type,
            session.sequence_number,
            task,
            session.started_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    lines.join("\n")
}

/// Format a cycle prediction.
#[must_use]
pub fn format_next_pretty(next: &NextSession, auto_start: bool) -> String {
    let duration = format_duration(Duration::seconds(i64::from(next.duration_seconds)));
    let auto = if auto_start {
        "starts automatically".green().to_string()
    } else {
        "waiting for you".dimmed().to_string()
    };
    format!(
        "Next up: {} #{} ({duration}) - {auto}",
        next.session_type.to_string().bold(),
        next.sequence_number,
    )
}

/// Format a Pomodoro layout suggestion.
#[must_use]
pub fn format_suggestion_pretty(suggestion: &PomodoroSuggestion) -> String {
    format!(
        "Suggested: {} x {}m work with {}m breaks ({}m total)",
        suggestion.cycles,
        suggestion.work_minutes,
        suggestion.short_break_minutes,
        suggestion.total_minutes,
    )
}
