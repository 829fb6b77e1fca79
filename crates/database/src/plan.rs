//! Subscription plan operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::SubscriptionPlan;

/// Create a new subscription plan.
///
/// The plan name is unique; a duplicate fails with `AlreadyExists`.
pub async fn create_plan(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    price_cents: i64,
    max_api_keys: Option<i64>,
    max_monthly_calls: Option<i64>,
) -> Result<SubscriptionPlan> {
    let result = sqlx::query(
        r#"
        INSERT INTO subscription_plans (name, description, price_cents, max_api_keys, max_monthly_calls)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(max_api_keys)
    .bind(max_monthly_calls)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "SubscriptionPlan",
                    id: name.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_plan(pool, result.last_insert_rowid()).await
}

/// Get a subscription plan by ID.
pub async fn get_plan(pool: &SqlitePool, id: i64) -> Result<SubscriptionPlan> {
    find_plan(pool, id).await?.ok_or_else(|| DatabaseError::NotFound {
        entity: "SubscriptionPlan",
        id: id.to_string(),
    })
}

/// Look up a subscription plan by ID, returning `None` when absent.
///
/// Used by the API key quota check, where a missing plan is not an error.
pub async fn find_plan(pool: &SqlitePool, id: i64) -> Result<Option<SubscriptionPlan>> {
    let plan = sqlx::query_as::<_, SubscriptionPlan>(
        r#"
        SELECT id, name, description, price_cents, max_api_keys, max_monthly_calls, created_at
        FROM subscription_plans
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(plan)
}

/// List all subscription plans in insertion order.
pub async fn list_plans(pool: &SqlitePool) -> Result<Vec<SubscriptionPlan>> {
    let plans = sqlx::query_as::<_, SubscriptionPlan>(
        r#"
        SELECT id, name, description, price_cents, max_api_keys, max_monthly_calls, created_at
        FROM subscription_plans
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(plans)
}
