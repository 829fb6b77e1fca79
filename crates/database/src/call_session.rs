//! Call session operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::CallSession;
use crate::user;

/// Create a new call session for a user.
///
/// The user must exist and the Twilio call ID must be fresh. Sessions start
/// open (`end_time` null).
pub async fn create_call_session(
    pool: &SqlitePool,
    twilio_call_id: &str,
    user_id: i64,
    start_time: &str,
) -> Result<CallSession> {
    user::get_user(pool, user_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO call_sessions (twilio_call_id, user_id, start_time)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(twilio_call_id)
    .bind(user_id)
    .bind(start_time)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "CallSession",
                    id: twilio_call_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_call_session(pool, result.last_insert_rowid()).await
}

/// Get a call session by ID.
pub async fn get_call_session(pool: &SqlitePool, id: i64) -> Result<CallSession> {
    sqlx::query_as::<_, CallSession>(
        r#"
        SELECT id, twilio_call_id, user_id, start_time, end_time, created_at
        FROM call_sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "CallSession",
        id: id.to_string(),
    })
}

/// End an open call session.
///
/// A session ends exactly once; `end_time` is immutable afterwards. The
/// `end_time IS NULL` guard in the update closes the race between the fetch
/// and the write.
pub async fn end_call_session(pool: &SqlitePool, id: i64, end_time: &str) -> Result<CallSession> {
    let session = get_call_session(pool, id).await?;

    if session.end_time.is_some() {
        return Err(DatabaseError::SessionAlreadyEnded { id });
    }

    let result = sqlx::query(
        r#"
        UPDATE call_sessions
        SET end_time = ?
        WHERE id = ? AND end_time IS NULL
        "#,
    )
    .bind(end_time)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::SessionAlreadyEnded { id });
    }

    get_call_session(pool, id).await
}

/// List every session for a user, open or ended, in insertion order.
pub async fn list_call_sessions_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<CallSession>> {
    user::get_user(pool, user_id).await?;

    let sessions = sqlx::query_as::<_, CallSession>(
        r#"
        SELECT id, twilio_call_id, user_id, start_time, end_time, created_at
        FROM call_sessions
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}
