//! Focus session persistence.
//!
//! This is the caller-side glue around the engine: sessions returned by
//! engine operations are saved here, and cycle prediction reads its
//! completed-work count from this history.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::session::{FocusSession, SessionType};
use crate::error::CadenceError;
use crate::storage::Database;

/// Storage for focus sessions.
pub struct FocusStorage {
    db: Database,
}

impl FocusStorage {
    /// Create a new focus storage at the default database location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn new() -> Result<Self, CadenceError> {
        let db = Database::open()?;
        Ok(Self { db })
    }

    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Save a session.
    ///
    /// If the session has an ID it is updated, otherwise inserted and the
    /// new ID written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save(&self, session: &mut FocusSession) -> Result<(), CadenceError> {
        if session.id.is_some() {
            self.update(session)
        } else {
            self.insert(session)
        }
    }

    /// Insert a new session.
    fn insert(&self, session: &mut FocusSession) -> Result<(), CadenceError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO focus_sessions
              (user_id, task_ref, session_type, sequence_number, duration_seconds,
               completed, started_at, ended_at, paused_at, paused_seconds, payload)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                session.user_id,
                session.task_ref,
                session.session_type.as_str(),
                session.sequence_number,
                session.duration_seconds,
                session.completed,
                session.started_at.to_rfc3339(),
                session.ended_at.map(|t| t.to_rfc3339()),
                session.paused_at.map(|t| t.to_rfc3339()),
                session.paused_seconds,
                serde_json::to_string(&session.payload)?,
            ],
        )
        .map_err(|e| CadenceError::Database(format!("Failed to insert session: {e}")))?;

        session.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    /// Update an existing session.
    fn update(&self, session: &FocusSession) -> Result<(), CadenceError> {
        let conn = self.db.connection();

        let updated = conn
            .execute(
                r"UPDATE focus_sessions
                  SET task_ref = ?2, session_type = ?3, sequence_number = ?4,
                      duration_seconds = ?5, completed = ?6, started_at = ?7,
                      ended_at = ?8, paused_at = ?9, paused_seconds = ?10, payload = ?11
                  WHERE id = ?1",
                params![
                    session.id,
                    session.task_ref,
                    session.session_type.as_str(),
                    session.sequence_number,
                    session.duration_seconds,
                    session.completed,
                    session.started_at.to_rfc3339(),
                    session.ended_at.map(|t| t.to_rfc3339()),
                    session.paused_at.map(|t| t.to_rfc3339()),
                    session.paused_seconds,
                    serde_json::to_string(&session.payload)?,
                ],
            )
            .map_err(|e| CadenceError::Database(format!("Failed to update session: {e}")))?;

        if updated == 0 {
            return Err(CadenceError::NotFound(format!(
                "Session {:?} does not exist",
                session.id
            )));
        }
        Ok(())
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<FocusSession>, CadenceError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!("{SELECT_SESSION} WHERE id = ?1"))
            .map_err(|e| CadenceError::Database(format!("Failed to prepare query: {e}")))?;

        let result = stmt
            .query_row([id], row_to_session)
            .optional()
            .map_err(|e| CadenceError::Database(format!("Failed to query session: {e}")))?;

        Ok(result)
    }

    /// Get the user's current in-progress session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_active(&self, user_id: &str) -> Result<Option<FocusSession>, CadenceError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_SESSION}
                 WHERE user_id = ?1 AND ended_at IS NULL
                 ORDER BY started_at DESC
                 LIMIT 1"
            ))
            .map_err(|e| CadenceError::Database(format!("Failed to prepare query: {e}")))?;

        let result = stmt
            .query_row([user_id], row_to_session)
            .optional()
            .map_err(|e| CadenceError::Database(format!("Failed to query active session: {e}")))?;

        Ok(result)
    }

    /// Get the user's most recently ended session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn last_ended(&self, user_id: &str) -> Result<Option<FocusSession>, CadenceError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_SESSION}
                 WHERE user_id = ?1 AND ended_at IS NOT NULL
                 ORDER BY ended_at DESC
                 LIMIT 1"
            ))
            .map_err(|e| CadenceError::Database(format!("Failed to prepare query: {e}")))?;

        let result = stmt
            .query_row([user_id], row_to_session)
            .optional()
            .map_err(|e| CadenceError::Database(format!("Failed to query last session: {e}")))?;

        Ok(result)
    }

    /// Get the user's recent sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn history(&self, user_id: &str, limit: usize) -> Result<Vec<FocusSession>, CadenceError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_SESSION}
                 WHERE user_id = ?1
                 ORDER BY started_at DESC
                 LIMIT ?2"
            ))
            .map_err(|e| CadenceError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params![user_id, limit], row_to_session)
            .map_err(|e| CadenceError::Database(format!("Failed to query sessions: {e}")))?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row.map_err(|e| CadenceError::Database(e.to_string()))?);
        }

        Ok(sessions)
    }

    /// Count the user's completed work sessions started on the given day.
    ///
    /// Feeds cycle prediction: after a break, the next work session's
    /// sequence number is this count plus one.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn completed_work_today(
        &self,
        user_id: &str,
        day: NaiveDate,
    ) -> Result<u32, CadenceError> {
        let Some(day_start) = day.and_hms_opt(0, 0, 0) else {
            return Ok(0);
        };
        let day_start: DateTime<Utc> = day_start.and_utc();
        let day_end = day_start + chrono::Duration::days(1);

        let conn = self.db.connection();
        let count: i64 = conn
            .query_row(
                r"SELECT COUNT(*)
                  FROM focus_sessions
                  WHERE user_id = ?1
                    AND session_type = 'work'
                    AND completed = 1
                    AND started_at >= ?2 AND started_at < ?3",
                params![user_id, day_start.to_rfc3339(), day_end.to_rfc3339()],
                |row| row.get(0),
            )
            .map_err(|e| CadenceError::Database(format!("Failed to count work sessions: {e}")))?;

        Ok(u32::try_from(count).unwrap_or(0))
    }
}

const SELECT_SESSION: &str = r"SELECT id, user_id, task_ref, session_type, sequence_number,
        duration_seconds, completed, started_at, ended_at, paused_at,
        paused_seconds, payload
 FROM focus_sessions";

/// Map a database row to a session.
fn row_to_session(row: &Row<'_>) -> rusqlite::Result<FocusSession> {
    let session_type_str: String = row.get(3)?;
    let session_type = SessionType::parse(&session_type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("Unknown session type: {session_type_str}").into(),
        )
    })?;

    let payload_str: String = row.get(11)?;
    let payload = serde_json::from_str(&payload_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(11, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(FocusSession {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        task_ref: row.get(2)?,
        session_type,
        sequence_number: row.get(4)?,
        duration_seconds: row.get(5)?,
        completed: row.get(6)?,
        started_at: parse_timestamp(row, 7)?,
        ended_at: parse_optional_timestamp(row, 8)?,
        paused_at: parse_optional_timestamp(row, 9)?,
        paused_seconds: row.get(10)?,
        payload,
    })
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_optional_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        DateTime::parse_from_rfc3339(&t)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
    })
    .transpose()
}
