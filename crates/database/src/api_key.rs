//! API key operations.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::models::ApiKey;
use crate::{plan, user};

/// Partial update for an API key. `key_hash`, `user_id`, `created_at` and
/// `last_used_at` are never touched by updates.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyUpdate {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Create a new API key for a user.
///
/// The user must exist. When the user's plan sets `max_api_keys`, the count
/// of currently active keys must be below the limit. A plan reference that no
/// longer resolves skips the check entirely (treated as unlimited). New keys
/// start active with no `last_used_at`.
pub async fn create_api_key(
    pool: &SqlitePool,
    user_id: i64,
    key_hash: &str,
    name: &str,
) -> Result<ApiKey> {
    let user = user::get_user(pool, user_id).await?;

    if let Some(plan_id) = user.subscription_plan_id {
        match plan::find_plan(pool, plan_id).await? {
            Some(plan) => {
                if let Some(limit) = plan.max_api_keys {
                    let active = count_active_keys(pool, user_id).await?;
                    if active >= limit {
                        return Err(DatabaseError::ApiKeyQuotaExceeded { user_id, limit });
                    }
                }
            }
            None => {
                // Dangling plan reference: no limit applies.
                debug!(user_id, plan_id, "Plan missing, skipping API key quota check");
            }
        }
    }

    let result = sqlx::query(
        r#"
        INSERT INTO api_keys (user_id, key_hash, name)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(key_hash)
    .bind(name)
    .execute(pool)
    .await?;

    get_api_key(pool, result.last_insert_rowid()).await
}

/// Get an API key by ID.
pub async fn get_api_key(pool: &SqlitePool, id: i64) -> Result<ApiKey> {
    sqlx::query_as::<_, ApiKey>(
        r#"
        SELECT id, user_id, key_hash, name, is_active, created_at, last_used_at
        FROM api_keys
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "ApiKey",
        id: id.to_string(),
    })
}

/// List all keys for a user, active and inactive.
pub async fn list_api_keys_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<ApiKey>> {
    user::get_user(pool, user_id).await?;

    let keys = sqlx::query_as::<_, ApiKey>(
        r#"
        SELECT id, user_id, key_hash, name, is_active, created_at, last_used_at
        FROM api_keys
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(keys)
}

/// Apply a partial update to an API key.
pub async fn update_api_key(pool: &SqlitePool, id: i64, update: ApiKeyUpdate) -> Result<ApiKey> {
    let existing = get_api_key(pool, id).await?;

    let name = update.name.unwrap_or(existing.name);
    let is_active = update.is_active.unwrap_or(existing.is_active);

    sqlx::query(
        r#"
        UPDATE api_keys
        SET name = ?, is_active = ?
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await?;

    get_api_key(pool, id).await
}

/// Count a user's currently active keys.
async fn count_active_keys(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM api_keys
        WHERE user_id = ? AND is_active = 1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
