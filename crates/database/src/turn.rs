//! Conversation turn operations.

use sqlx::SqlitePool;

use crate::call_session;
use crate::error::{DatabaseError, Result};
use crate::models::{Turn, TurnRole};

/// Append a turn to an open call session.
///
/// The session must exist and must not have ended.
pub async fn create_turn(
    pool: &SqlitePool,
    call_session_id: i64,
    role: TurnRole,
    text: Option<&str>,
    latency_ms: Option<i64>,
) -> Result<Turn> {
    let session = call_session::get_call_session(pool, call_session_id).await?;

    if session.end_time.is_some() {
        return Err(DatabaseError::SessionEnded {
            id: call_session_id,
        });
    }

    let result = sqlx::query(
        r#"
        INSERT INTO turns (call_session_id, role, text, latency_ms)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(call_session_id)
    .bind(role)
    .bind(text)
    .bind(latency_ms)
    .execute(pool)
    .await?;

    get_turn(pool, result.last_insert_rowid()).await
}

/// Get a turn by ID.
pub async fn get_turn(pool: &SqlitePool, id: i64) -> Result<Turn> {
    sqlx::query_as::<_, Turn>(
        r#"
        SELECT id, call_session_id, role, text, latency_ms, created_at
        FROM turns
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Turn",
        id: id.to_string(),
    })
}

/// List all turns for a call session, earliest first.
///
/// Timestamps have second resolution, so id is the stable tie-break.
pub async fn list_turns_for_call_session(
    pool: &SqlitePool,
    call_session_id: i64,
) -> Result<Vec<Turn>> {
    call_session::get_call_session(pool, call_session_id).await?;

    let turns = sqlx::query_as::<_, Turn>(
        r#"
        SELECT id, call_session_id, role, text, latency_ms, created_at
        FROM turns
        WHERE call_session_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(call_session_id)
    .fetch_all(pool)
    .await?;

    Ok(turns)
}
