//! Session state machine.
//!
//! States: in progress, completed, abandoned, with an orthogonal paused
//! flag while in progress. Every operation takes its "now" from the
//! caller; the engine itself never reads a clock and never persists.
//! Callers save the returned records.
//!
//! Operations on a session that has already ended are idempotent no-ops,
//! not errors: the UI retries freely after network hiccups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::session::{FocusSession, SessionType};

/// Inputs for starting a session.
#[derive(Debug, Clone)]
pub struct StartRequest {
    /// Owning user.
    pub user_id: String,
    /// Optional task reference.
    pub task_ref: Option<String>,
    /// Session type.
    pub session_type: SessionType,
    /// Planned duration in seconds.
    pub duration_seconds: u32,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Position in the Pomodoro cycle (1-based).
    pub sequence_number: u32,
    /// Opaque payload carried on the session.
    pub payload: Map<String, Value>,
}

/// Result of a start: the new session plus the previously active session
/// if one had to be abandoned to make room for it.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    /// The prior in-progress session, now abandoned. Caller persists it.
    pub abandoned: Option<FocusSession>,
    /// The newly started session.
    pub session: FocusSession,
}

/// Inputs for ending a session.
#[derive(Debug, Clone)]
pub struct CompleteRequest {
    /// End timestamp.
    pub ended_at: DateTime<Utc>,
    /// Whether the session finished successfully.
    pub completed: bool,
    /// Client-accumulated pause seconds; merged with the server value via
    /// `max` so the larger estimate wins.
    pub paused_seconds_from_client: i64,
    /// Task status to apply on successful completion of a task-linked
    /// work session.
    pub mark_task_status: Option<String>,
}

/// Side effect for the caller to apply after a completed work session:
/// record the completion against the task and optionally update its
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    /// The task the session was linked to.
    pub task_ref: String,
    /// Status to set on the task, if requested.
    pub status: Option<String>,
}

/// Start a new session, abandoning any session still in progress.
///
/// This is the enforcement point for the one-active-session-per-user
/// invariant: `active` is the caller's consistent snapshot of the user's
/// current in-progress session, and it is ended (not completed) at the new
/// session's start time before the new one is created.
#[must_use]
pub fn start(active: Option<FocusSession>, req: StartRequest) -> StartOutcome {
    let abandoned = active.and_then(|mut prior| {
        if prior.is_in_progress() {
            abandon(&mut prior, req.started_at, 0);
            Some(prior)
        } else {
            None
        }
    });

    let session = FocusSession {
        id: None,
        user_id: req.user_id,
        task_ref: req.task_ref,
        session_type: req.session_type,
        sequence_number: req.sequence_number.max(1),
        duration_seconds: req.duration_seconds,
        completed: false,
        started_at: req.started_at,
        ended_at: None,
        paused_at: None,
        paused_seconds: 0,
        payload: req.payload,
    };

    StartOutcome { abandoned, session }
}

/// Pause the session at `now`. No-op if already paused or ended.
pub fn pause(session: &mut FocusSession, now: DateTime<Utc>) {
    if session.is_in_progress() && session.paused_at.is_none() {
        session.paused_at = Some(now);
    }
}

/// Resume the session at `now`, crediting the pause interval to
/// `paused_seconds`. No-op if not paused or already ended.
pub fn resume(session: &mut FocusSession, now: DateTime<Utc>) {
    if session.is_in_progress() {
        flush_pause(session, now);
    }
}

/// Fold an open pause interval into the accumulated total.
fn flush_pause(session: &mut FocusSession, now: DateTime<Utc>) {
    if let Some(paused_at) = session.paused_at.take() {
        let elapsed = now.signed_duration_since(paused_at).num_seconds().max(0);
        session.paused_seconds += elapsed;
    }
}

/// End the session.
///
/// Flushes any open pause first so a session paused at the moment of
/// completion still gets its pause interval credited, then merges the
/// client's pause estimate (`max` wins, guarding against clock drift).
///
/// Returns a [`TaskUpdate`] when a successfully completed work session is
/// linked to a task; the caller applies it. No-op returning `None` if the
/// session already ended.
pub fn complete(session: &mut FocusSession, req: &CompleteRequest) -> Option<TaskUpdate> {
    if !session.is_in_progress() {
        return None;
    }

    flush_pause(session, req.ended_at);
    session.paused_seconds = session
        .paused_seconds
        .max(req.paused_seconds_from_client.max(0));
    session.ended_at = Some(req.ended_at);
    session.completed = req.completed;

    if req.completed && session.session_type == SessionType::Work {
        session.task_ref.as_ref().map(|task_ref| TaskUpdate {
            task_ref: task_ref.clone(),
            status: req.mark_task_status.clone(),
        })
    } else {
        None
    }
}

/// End the session without completing it.
///
/// Used for explicit cancellation and by [`start`] when displacing a prior
/// in-progress session.
pub fn abandon(session: &mut FocusSession, ended_at: DateTime<Utc>, paused_seconds_from_client: i64) {
    let _ = complete(
        session,
        &CompleteRequest {
            ended_at,
            completed: false,
            paused_seconds_from_client,
            mark_task_status: None,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::session::SessionState;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn start_request(started_at: DateTime<Utc>) -> StartRequest {
        StartRequest {
            user_id: "local".to_string(),
            task_ref: Some("task-1".to_string()),
            session_type: SessionType::Work,
            duration_seconds: 1500,
            started_at,
            sequence_number: 1,
            payload: Map::new(),
        }
    }

    #[test]
    fn test_start_creates_in_progress_session() {
        let outcome = start(None, start_request(ts("2026-02-01T09:00:00Z")));

        assert!(outcome.abandoned.is_none());
        assert_eq!(outcome.session.state(), SessionState::InProgress);
        assert_eq!(outcome.session.paused_seconds, 0);
        assert!(outcome.session.paused_at.is_none());
    }

    #[test]
    fn test_start_abandons_prior_in_progress_session() {
        let first = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;
        let outcome = start(Some(first), start_request(ts("2026-02-01T09:10:00Z")));

        let abandoned = outcome.abandoned.unwrap();
        assert_eq!(abandoned.state(), SessionState::Abandoned);
        assert!(!abandoned.completed);
        assert_eq!(abandoned.ended_at, Some(ts("2026-02-01T09:10:00Z")));
        assert_eq!(outcome.session.state(), SessionState::InProgress);
    }

    #[test]
    fn test_start_leaves_ended_session_alone() {
        let mut first = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;
        abandon(&mut first, ts("2026-02-01T09:05:00Z"), 0);

        let outcome = start(Some(first), start_request(ts("2026-02-01T09:10:00Z")));
        assert!(outcome.abandoned.is_none());
    }

    #[test]
    fn test_pause_resume_accounting() {
        let mut session = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;

        pause(&mut session, ts("2026-02-01T09:05:00Z"));
        assert!(session.is_paused());

        resume(&mut session, ts("2026-02-01T09:07:30Z"));
        assert!(!session.is_paused());
        assert_eq!(session.paused_seconds, 150);
        assert!(session.paused_at.is_none());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut session = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;

        pause(&mut session, ts("2026-02-01T09:05:00Z"));
        pause(&mut session, ts("2026-02-01T09:06:00Z"));
        assert_eq!(session.paused_at, Some(ts("2026-02-01T09:05:00Z")));
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut session = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;
        resume(&mut session, ts("2026-02-01T09:05:00Z"));
        assert_eq!(session.paused_seconds, 0);
    }

    #[test]
    fn test_complete_flushes_open_pause() {
        let mut session = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;
        pause(&mut session, ts("2026-02-01T09:20:00Z"));

        let update = complete(
            &mut session,
            &CompleteRequest {
                ended_at: ts("2026-02-01T09:25:00Z"),
                completed: true,
                paused_seconds_from_client: 0,
                mark_task_status: Some("done".to_string()),
            },
        );

        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.paused_seconds, 300);
        assert!(session.paused_at.is_none());
        assert_eq!(
            update,
            Some(TaskUpdate {
                task_ref: "task-1".to_string(),
                status: Some("done".to_string()),
            })
        );
    }

    #[test]
    fn test_complete_merges_client_pause_with_max() {
        let mut session = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;
        session.paused_seconds = 120;

        let _ = complete(
            &mut session,
            &CompleteRequest {
                ended_at: ts("2026-02-01T09:25:00Z"),
                completed: true,
                paused_seconds_from_client: 90,
                mark_task_status: None,
            },
        );
        // Server value is larger; stale client estimate loses.
        assert_eq!(session.paused_seconds, 120);

        let mut session = start(None, start_request(ts("2026-02-01T10:00:00Z"))).session;
        session.paused_seconds = 60;
        let _ = complete(
            &mut session,
            &CompleteRequest {
                ended_at: ts("2026-02-01T10:25:00Z"),
                completed: true,
                paused_seconds_from_client: 200,
                mark_task_status: None,
            },
        );
        assert_eq!(session.paused_seconds, 200);
    }

    #[test]
    fn test_complete_break_yields_no_task_update() {
        let mut req = start_request(ts("2026-02-01T09:00:00Z"));
        req.session_type = SessionType::ShortBreak;
        let mut session = start(None, req).session;

        let update = complete(
            &mut session,
            &CompleteRequest {
                ended_at: ts("2026-02-01T09:05:00Z"),
                completed: true,
                paused_seconds_from_client: 0,
                mark_task_status: Some("done".to_string()),
            },
        );
        assert!(update.is_none());
    }

    #[test]
    fn test_abandon_forces_incomplete() {
        let mut session = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;
        abandon(&mut session, ts("2026-02-01T09:10:00Z"), 30);

        assert_eq!(session.state(), SessionState::Abandoned);
        assert!(!session.completed);
        assert_eq!(session.paused_seconds, 30);
    }

    #[test]
    fn test_operations_on_ended_session_are_noops() {
        let mut session = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;
        let _ = complete(
            &mut session,
            &CompleteRequest {
                ended_at: ts("2026-02-01T09:25:00Z"),
                completed: true,
                paused_seconds_from_client: 0,
                mark_task_status: None,
            },
        );
        let snapshot = session.clone();

        pause(&mut session, ts("2026-02-01T09:30:00Z"));
        resume(&mut session, ts("2026-02-01T09:31:00Z"));
        abandon(&mut session, ts("2026-02-01T09:32:00Z"), 999);
        let update = complete(
            &mut session,
            &CompleteRequest {
                ended_at: ts("2026-02-01T09:33:00Z"),
                completed: false,
                paused_seconds_from_client: 999,
                mark_task_status: None,
            },
        );

        assert!(update.is_none());
        assert_eq!(session, snapshot);
    }

    #[test]
    fn test_negative_client_pause_is_ignored() {
        let mut session = start(None, start_request(ts("2026-02-01T09:00:00Z"))).session;
        abandon(&mut session, ts("2026-02-01T09:10:00Z"), -50);
        assert_eq!(session.paused_seconds, 0);
    }
}
