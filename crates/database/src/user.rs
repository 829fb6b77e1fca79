//! User account operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;
use crate::plan;

/// Partial update for a user account.
///
/// `None` leaves a field untouched; `subscription_plan_id` uses a nested
/// option so the plan link can be explicitly cleared with `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub subscription_plan_id: Option<Option<i64>>,
}

/// Create a new user.
///
/// When a subscription plan is given it must exist; duplicate emails fail
/// with `AlreadyExists`.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    subscription_plan_id: Option<i64>,
) -> Result<User> {
    if let Some(plan_id) = subscription_plan_id {
        plan::get_plan(pool, plan_id).await?;
    }

    let result = sqlx::query(
        r#"
        INSERT INTO users (email, name, subscription_plan_id)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(subscription_plan_id)
    .execute(pool)
    .await
    .map_err(|e| unique_to_conflict(e, email))?;

    get_user(pool, result.last_insert_rowid()).await
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, subscription_plan_id, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// List all users in insertion order.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, subscription_plan_id, created_at, updated_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Apply a partial update to a user.
///
/// Omitted fields keep their prior value. `updated_at` is refreshed on every
/// successful update, even when the new values match the old ones. A new
/// email that belongs to another user fails with `AlreadyExists`.
pub async fn update_user(pool: &SqlitePool, id: i64, update: UserUpdate) -> Result<User> {
    let existing = get_user(pool, id).await?;

    if let Some(email) = &update.email {
        let taken: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE email = ? AND id != ?")
                .bind(email)
                .bind(id)
                .fetch_optional(pool)
                .await?;
        if taken.is_some() {
            return Err(DatabaseError::AlreadyExists {
                entity: "User",
                id: email.clone(),
            });
        }
    }

    let email = update.email.unwrap_or(existing.email);
    let name = update.name.unwrap_or(existing.name);
    let subscription_plan_id = update
        .subscription_plan_id
        .unwrap_or(existing.subscription_plan_id);

    sqlx::query(
        r#"
        UPDATE users
        SET email = ?, name = ?, subscription_plan_id = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&email)
    .bind(&name)
    .bind(subscription_plan_id)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| unique_to_conflict(e, &email))?;

    get_user(pool, id).await
}

/// Map a unique-constraint rejection on the email column to `AlreadyExists`.
fn unique_to_conflict(e: sqlx::Error, email: &str) -> DatabaseError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return DatabaseError::AlreadyExists {
                entity: "User",
                id: email.to_string(),
            };
        }
    }
    DatabaseError::Sqlx(e)
}
