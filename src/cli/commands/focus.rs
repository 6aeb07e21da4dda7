//! Focus session commands.
//!
//! The service-layer glue around the engine: load the current state from
//! storage, run the engine operation with the current wall clock, persist
//! what it returns, and format the result.

use chrono::Utc;
use colored::Colorize;
use serde_json::Map;

use crate::cli::args::{FocusCommands, OutputFormat};
use crate::config::Config;
use crate::error::CadenceError;
use crate::focus::{
    engine, format_duration, parse_duration, FocusStorage, SessionType, StartRequest,
};
use crate::output::{format_session, format_sessions, to_json};

/// Execute focus subcommands.
///
/// # Errors
///
/// Returns an error if storage fails or the command's inputs are invalid.
pub fn focus(
    storage: &FocusStorage,
    config: &Config,
    user: &str,
    cmd: FocusCommands,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match cmd {
        FocusCommands::Start {
            task,
            session_type,
            duration,
            sequence,
            payload,
        } => start_session(
            storage,
            config,
            user,
            task,
            &session_type,
            duration.as_deref(),
            sequence,
            payload.as_deref(),
            format,
        ),

        FocusCommands::Pause => pause_session(storage, user, format),
        FocusCommands::Resume => resume_session(storage, user, format),

        FocusCommands::Stop {
            abandon,
            paused_seconds,
            mark_task,
        } => stop_session(storage, user, abandon, paused_seconds, mark_task, format),

        FocusCommands::Status => show_status(storage, user, format),
        FocusCommands::History { limit } => show_history(storage, user, limit, format),
    }
}

/// Start a new session, abandoning any in-progress one.
#[allow(clippy::too_many_arguments)]
fn start_session(
    storage: &FocusStorage,
    config: &Config,
    user: &str,
    task: Option<String>,
    session_type: &str,
    duration: Option<&str>,
    sequence: Option<u32>,
    payload: Option<&str>,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let session_type = SessionType::parse(session_type).ok_or_else(|| {
        CadenceError::Parse(format!(
            "Unknown session type '{session_type}' (expected work, short_break, or long_break)"
        ))
    })?;

    let duration_seconds = match duration {
        Some(d) => parse_duration(d)
            .and_then(|d| u32::try_from(d.num_seconds()).ok())
            .ok_or_else(|| CadenceError::Parse(format!("Invalid duration '{d}'")))?,
        None => default_duration_seconds(config, session_type),
    };

    let payload: Map<String, serde_json::Value> = match payload {
        Some(p) => serde_json::from_str(p)
            .map_err(|e| CadenceError::Parse(format!("Invalid payload JSON: {e}")))?,
        None => Map::new(),
    };

    let now = Utc::now();
    let sequence_number = match sequence {
        Some(s) => s,
        None => {
            let done = storage.completed_work_today(user, now.date_naive())?;
            if session_type.is_break() {
                done.max(1)
            } else {
                done + 1
            }
        }
    };

    let active = storage.get_active(user)?;
    let outcome = engine::start(
        active,
        StartRequest {
            user_id: user.to_string(),
            task_ref: task,
            session_type,
            duration_seconds,
            started_at: now,
            sequence_number,
            payload,
        },
    );

    let mut abandoned_line = None;
    if let Some(mut abandoned) = outcome.abandoned {
        storage.save(&mut abandoned)?;
        abandoned_line = Some(format!(
            "Abandoned previous {} session",
            abandoned.session_type
        ));
    }

    let mut session = outcome.session;
    storage.save(&mut session)?;

    match format {
        OutputFormat::Json => to_json(&session),
        OutputFormat::Pretty => {
            let mut output = Vec::new();
            if let Some(line) = abandoned_line {
                output.push(line.dimmed().to_string());
            }
            output.push(
                format!("🎯 {} session #{} started!", session_type, session.sequence_number)
                    .green()
                    .to_string(),
            );
            if let Some(ref task_ref) = session.task_ref {
                output.push(format!("   Task: {task_ref}"));
            }
            output.push(format!(
                "   Duration: {}",
                format_duration(chrono::Duration::seconds(i64::from(duration_seconds)))
            ));
            Ok(output.join("\n"))
        }
    }
}

/// Default duration for a session type from settings.
const fn default_duration_seconds(config: &Config, session_type: SessionType) -> u32 {
    let minutes = match session_type {
        SessionType::Work => config.pomodoro.work_minutes,
        SessionType::ShortBreak => config.pomodoro.short_break_minutes,
        SessionType::LongBreak => config.pomodoro.long_break_minutes,
    };
    minutes * 60
}

/// Pause the active session.
fn pause_session(
    storage: &FocusStorage,
    user: &str,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let mut session = require_active(storage, user)?;
    engine::pause(&mut session, Utc::now());
    storage.save(&mut session)?;
    format_session(&session, Utc::now(), format)
}

/// Resume the paused session.
fn resume_session(
    storage: &FocusStorage,
    user: &str,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let mut session = require_active(storage, user)?;
    engine::resume(&mut session, Utc::now());
    storage.save(&mut session)?;
    format_session(&session, Utc::now(), format)
}

/// End the active session.
fn stop_session(
    storage: &FocusStorage,
    user: &str,
    abandon: bool,
    paused_seconds: i64,
    mark_task: Option<String>,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let mut session = require_active(storage, user)?;
    let now = Utc::now();

    let task_update = engine::complete(
        &mut session,
        &engine::CompleteRequest {
            ended_at: now,
            completed: !abandon,
            paused_seconds_from_client: paused_seconds,
            mark_task_status: mark_task,
        },
    );
    storage.save(&mut session)?;

    match format {
        OutputFormat::Json => to_json(&session),
        OutputFormat::Pretty => {
            let mut output = vec![format_session(&session, now, format)?];
            if let Some(update) = task_update {
                let note = update.status.as_ref().map_or_else(
                    || format!("   Logged completion against task {}", update.task_ref),
                    |status| format!("   Task {} marked as {status}", update.task_ref),
                );
                output.push(note.dimmed().to_string());
            }
            Ok(output.join("\n"))
        }
    }
}

/// Show the active session.
fn show_status(
    storage: &FocusStorage,
    user: &str,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match storage.get_active(user)? {
        Some(session) => format_session(&session, Utc::now(), format),
        None => match format {
            OutputFormat::Json => Ok("null".to_string()),
            OutputFormat::Pretty => Ok("No active focus session".dimmed().to_string()),
        },
    }
}

/// Show recent sessions.
fn show_history(
    storage: &FocusStorage,
    user: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let sessions = storage.history(user, limit)?;
    format_sessions(&sessions, format)
}

/// Fetch the active session or fail with a helpful message.
fn require_active(
    storage: &FocusStorage,
    user: &str,
) -> Result<crate::focus::FocusSession, CadenceError> {
    storage.get_active(user)?.ok_or_else(|| {
        CadenceError::NotFound(
            "No active focus session. Start one with 'cadence focus start'.".to_string(),
        )
    })
}
