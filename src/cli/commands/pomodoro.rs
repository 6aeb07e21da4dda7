//! Pomodoro cycle commands.

use chrono::Utc;

use crate::cli::args::{OutputFormat, PomodoroCommands};
use crate::config::Config;
use crate::error::CadenceError;
use crate::focus::{pomodoro, FocusStorage};
use crate::output::{format_next, format_suggestion};

/// Execute pomodoro subcommands.
///
/// # Errors
///
/// Returns an error if storage fails or there is no cycle to continue.
pub fn pomodoro(
    storage: &FocusStorage,
    config: &Config,
    user: &str,
    cmd: PomodoroCommands,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match cmd {
        PomodoroCommands::Next => predict_next(storage, config, user, format),
        PomodoroCommands::Suggest { minutes } => suggest(minutes, format),
    }
}

/// Predict the next session in the cycle.
///
/// Only sessions that are part of a Pomodoro cycle qualify: breaks always
/// do, work sessions only when their payload tags them as Pomodoro. Plain
/// sprint sessions never trigger prediction.
fn predict_next(
    storage: &FocusStorage,
    config: &Config,
    user: &str,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let last = storage.last_ended(user)?.ok_or_else(|| {
        CadenceError::NotFound("No ended session to continue a cycle from".to_string())
    })?;

    let is_pomodoro = last.session_type.is_break()
        || last
            .payload
            .get("focus_mode_type")
            .and_then(serde_json::Value::as_str)
            == Some("pomodoro");
    if !is_pomodoro {
        return Err(CadenceError::NotFound(
            "Last session was not part of a Pomodoro cycle".to_string(),
        ));
    }

    let completed_today = storage.completed_work_today(user, Utc::now().date_naive())?;
    let next = pomodoro::next(&last, &config.pomodoro, completed_today);
    let auto = pomodoro::auto_start(&config.pomodoro, next.session_type);

    format_next(&next, auto, format)
}

/// Suggest a Pomodoro layout for a task duration.
fn suggest(minutes: i64, format: OutputFormat) -> Result<String, CadenceError> {
    let suggestion = pomodoro::suggest(minutes).ok_or_else(|| {
        CadenceError::Parse("Task duration must be at least 1 minute".to_string())
    })?;
    format_suggestion(&suggestion, format)
}
