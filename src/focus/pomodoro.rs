//! Pomodoro cycle prediction and settings.

use serde::{Deserialize, Serialize};

use super::session::{FocusSession, SessionType};

/// Per-user Pomodoro configuration.
///
/// Created with defaults on first access; all fields have serde defaults
/// so a partial config file fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroSettings {
    /// Work interval length in minutes.
    pub work_minutes: u32,
    /// Short break length in minutes.
    pub short_break_minutes: u32,
    /// Long break length in minutes.
    pub long_break_minutes: u32,
    /// Work sessions before a long break. Values below 2 are treated as 2.
    pub long_break_after: u32,
    /// Automatically start the break after a work session.
    pub auto_start_break: bool,
    /// Automatically start the next work session after a break.
    pub auto_start_pomodoro: bool,
    /// Play a sound when a session ends.
    pub sound_enabled: bool,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_after: 4,
            auto_start_break: false,
            auto_start_pomodoro: false,
            sound_enabled: true,
        }
    }
}

impl PomodoroSettings {
    /// Effective long-break spacing; the invariant is `>= 2`.
    #[must_use]
    pub const fn long_break_after(&self) -> u32 {
        if self.long_break_after < 2 {
            2
        } else {
            self.long_break_after
        }
    }
}

/// The session a Pomodoro flow should queue next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextSession {
    /// Type of the next session.
    pub session_type: SessionType,
    /// Its position in the cycle (1-based).
    pub sequence_number: u32,
    /// Planned duration in seconds.
    pub duration_seconds: u32,
}

/// Predict the session that follows `completed` in the cycle.
///
/// After a work session the break keeps the work session's sequence
/// number; every `long_break_after`-th work session earns the long break.
/// After a break the next work session's sequence is recomputed from
/// `completed_work_today` (the user's persisted count of work sessions
/// completed today) rather than incremented from the break's carried
/// number, so sessions lost to page reloads do not skew the cycle.
#[must_use]
pub fn next(
    completed: &FocusSession,
    settings: &PomodoroSettings,
    completed_work_today: u32,
) -> NextSession {
    if completed.session_type == SessionType::Work {
        let sequence = completed.sequence_number.max(1);
        let (session_type, minutes) = if sequence % settings.long_break_after() == 0 {
            (SessionType::LongBreak, settings.long_break_minutes)
        } else {
            (SessionType::ShortBreak, settings.short_break_minutes)
        };

        NextSession {
            session_type,
            sequence_number: sequence,
            duration_seconds: minutes * 60,
        }
    } else {
        NextSession {
            session_type: SessionType::Work,
            sequence_number: completed_work_today + 1,
            duration_seconds: settings.work_minutes * 60,
        }
    }
}

/// Whether the predicted session should start automatically.
#[must_use]
pub const fn auto_start(settings: &PomodoroSettings, session_type: SessionType) -> bool {
    match session_type {
        SessionType::Work => settings.auto_start_pomodoro,
        SessionType::ShortBreak | SessionType::LongBreak => settings.auto_start_break,
    }
}

/// Bounds for suggested work intervals, in minutes.
const MIN_WORK_MINUTES: i64 = 10;
const MAX_WORK_MINUTES: i64 = 60;
/// Target length of one work+break cycle when tiling, in minutes.
const TARGET_CYCLE_MINUTES: i64 = 30;
const SUGGESTED_SHORT_BREAK_MINUTES: i64 = 5;

/// A Pomodoro layout suggested for a task of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSuggestion {
    /// Suggested work interval in minutes.
    pub work_minutes: u32,
    /// Suggested short break in minutes.
    pub short_break_minutes: u32,
    /// Number of work intervals.
    pub cycles: u32,
    /// Total tiled time in minutes (work plus interior breaks).
    pub total_minutes: u32,
}

/// Suggest a Pomodoro layout tiling `task_minutes` into whole work+break
/// cycles, with the work interval clamped to 10-60 minutes.
///
/// Returns `None` for durations under one minute. Pure and deterministic.
#[must_use]
pub fn suggest(task_minutes: i64) -> Option<PomodoroSuggestion> {
    if task_minutes < 1 {
        return None;
    }

    let cycles = ((task_minutes + TARGET_CYCLE_MINUTES - 1) / TARGET_CYCLE_MINUTES).max(1);
    let break_total = (cycles - 1) * SUGGESTED_SHORT_BREAK_MINUTES;
    let work = ((task_minutes - break_total).max(1) / cycles)
        .clamp(MIN_WORK_MINUTES, MAX_WORK_MINUTES);
    let total = cycles * work + break_total;

    Some(PomodoroSuggestion {
        work_minutes: u32::try_from(work).ok()?,
        short_break_minutes: u32::try_from(SUGGESTED_SHORT_BREAK_MINUTES).ok()?,
        cycles: u32::try_from(cycles).ok()?,
        total_minutes: u32::try_from(total).ok()?,
    })
}
