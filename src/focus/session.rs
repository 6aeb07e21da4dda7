//! Focus session record and derived state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type of focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// A work interval.
    Work,
    /// Short break between work intervals.
    ShortBreak,
    /// Long break after a full set of work intervals.
    LongBreak,
}

impl SessionType {
    /// Parse a session type from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "work" | "w" | "pomodoro" => Some(Self::Work),
            "short_break" | "short-break" | "short" | "sb" => Some(Self::ShortBreak),
            "long_break" | "long-break" | "long" | "lb" => Some(Self::LongBreak),
            _ => None,
        }
    }

    /// Stable string tag used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Check if this is a break type.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lifecycle state of a session, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Started and not yet ended (may be paused).
    InProgress,
    /// Ended successfully.
    Completed,
    /// Ended without completing.
    Abandoned,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Abandoned => write!(f, "Abandoned"),
        }
    }
}

/// A focus session.
///
/// Owned by exactly one user; the engine guarantees at most one of a
/// user's sessions is in progress at a time. The record is never deleted
/// by the engine, only ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    /// Database ID (None if not persisted).
    pub id: Option<i64>,
    /// Owning user.
    pub user_id: String,
    /// Optional reference to the task being worked on; breaks usually
    /// have none.
    pub task_ref: Option<String>,
    /// Session type.
    pub session_type: SessionType,
    /// Position in the Pomodoro cycle (1-based). Breaks carry the sequence
    /// number of the work session they follow.
    pub sequence_number: u32,
    /// Planned duration in seconds.
    pub duration_seconds: u32,
    /// Whether the session ended successfully.
    pub completed: bool,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended (None while in progress).
    pub ended_at: Option<DateTime<Utc>>,
    /// When the current pause began (None unless paused).
    pub paused_at: Option<DateTime<Utc>>,
    /// Total seconds spent paused. Monotonically non-decreasing.
    pub paused_seconds: i64,
    /// Opaque key/value bag supplied by the caller (e.g. `focus_mode_type`).
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl FocusSession {
    /// Derive the lifecycle state from the record's fields.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        match self.ended_at {
            None => SessionState::InProgress,
            Some(_) if self.completed => SessionState::Completed,
            Some(_) => SessionState::Abandoned,
        }
    }

    /// Check if the session is still in progress.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Check if the session is currently paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.is_in_progress() && self.paused_at.is_some()
    }

    /// Working time elapsed at `now`, excluding pauses.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        let end = self.ended_at.map_or(now, |e| e.min(now));
        let total = end.signed_duration_since(self.started_at);

        let open_pause = self.paused_at.map_or_else(Duration::zero, |p| {
            end.signed_duration_since(p).max(Duration::zero())
        });

        (total - Duration::seconds(self.paused_seconds) - open_pause).max(Duration::zero())
    }

    /// Time left on the planned duration at `now`.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let planned = Duration::seconds(i64::from(self.duration_seconds));
        (planned - self.elapsed(now)).max(Duration::zero())
    }

    /// One-line status summary for display.
    #[must_use]
    pub fn format_status(&self, now: DateTime<Utc>) -> String {
        let task_info = self
            .task_ref
            .as_ref()
            .map_or_else(String::new, |t| format!(" on \"{t}\""));

        let state = if self.is_paused() {
            "Paused".to_string()
        } else {
            self.state().to_string()
        };

        let session_type = self.session_type;
        let seq = self.sequence_number;
        let remaining = super::duration::format_duration_mmss(self.remaining(now));

        format!("{session_type} #{seq}{task_info} - {remaining} remaining [{state}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn session() -> FocusSession {
        FocusSession {
            id: None,
            user_id: "local".to_string(),
            task_ref: Some("task-1".to_string()),
            session_type: SessionType::Work,
            sequence_number: 1,
            duration_seconds: 1500,
            completed: false,
            started_at: ts("2026-02-01T09:00:00Z"),
            ended_at: None,
            paused_at: None,
            paused_seconds: 0,
            payload: Map::new(),
        }
    }

    #[test]
    fn test_session_type_parse() {
        assert_eq!(SessionType::parse("work"), Some(SessionType::Work));
        assert_eq!(SessionType::parse("short_break"), Some(SessionType::ShortBreak));
        assert_eq!(SessionType::parse("lb"), Some(SessionType::LongBreak));
        assert_eq!(SessionType::parse("nap"), None);
    }

    #[test]
    fn test_session_type_is_break() {
        assert!(!SessionType::Work.is_break());
        assert!(SessionType::ShortBreak.is_break());
        assert!(SessionType::LongBreak.is_break());
    }

    #[test]
    fn test_state_derivation() {
        let mut s = session();
        assert_eq!(s.state(), SessionState::InProgress);

        s.ended_at = Some(ts("2026-02-01T09:25:00Z"));
        assert_eq!(s.state(), SessionState::Abandoned);

        s.completed = true;
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_elapsed_excludes_accumulated_pause() {
        let mut s = session();
        s.paused_seconds = 300;
        let elapsed = s.elapsed(ts("2026-02-01T09:20:00Z"));
        assert_eq!(elapsed.num_seconds(), 20 * 60 - 300);
    }

    #[test]
    fn test_elapsed_excludes_open_pause() {
        let mut s = session();
        s.paused_at = Some(ts("2026-02-01T09:10:00Z"));
        let elapsed = s.elapsed(ts("2026-02-01T09:20:00Z"));
        assert_eq!(elapsed.num_seconds(), 10 * 60);
    }

    #[test]
    fn test_remaining_floors_at_zero() {
        let s = session();
        let remaining = s.remaining(ts("2026-02-01T10:00:00Z"));
        assert_eq!(remaining.num_seconds(), 0);
    }

    #[test]
    fn test_format_status_counts_down_in_mmss() {
        let s = session();
        let status = s.format_status(ts("2026-02-01T09:05:00Z"));
        assert!(status.contains("20:00 remaining"));
        assert!(status.contains("In Progress"));
    }

    #[test]
    fn test_serde_round_trip_with_payload() {
        let mut s = session();
        s.payload
            .insert("focus_mode_type".to_string(), Value::String("pomodoro".to_string()));
        let json = serde_json::to_string(&s).unwrap();
        let back: FocusSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
