//! Voice library operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Voice;

/// Create a new voice entry.
///
/// The provider identifier is unique; a duplicate fails with `AlreadyExists`.
pub async fn create_voice(
    pool: &SqlitePool,
    name: &str,
    identifier: &str,
    description: Option<&str>,
) -> Result<Voice> {
    let result = sqlx::query(
        r#"
        INSERT INTO voices (name, identifier, description)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(identifier)
    .bind(description)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Voice",
                    id: identifier.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_voice(pool, result.last_insert_rowid()).await
}

/// Get a voice by ID.
pub async fn get_voice(pool: &SqlitePool, id: i64) -> Result<Voice> {
    sqlx::query_as::<_, Voice>(
        r#"
        SELECT id, name, identifier, description, created_at
        FROM voices
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Voice",
        id: id.to_string(),
    })
}

/// List all voices ordered by name.
pub async fn list_voices(pool: &SqlitePool) -> Result<Vec<Voice>> {
    let voices = sqlx::query_as::<_, Voice>(
        r#"
        SELECT id, name, identifier, description, created_at
        FROM voices
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(voices)
}
