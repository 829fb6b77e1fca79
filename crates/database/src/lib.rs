//! SQLite persistence layer for Switchboard.
//!
//! This crate provides async database operations for the voice platform's
//! back office: subscription plans, users, API keys, voices, call sessions,
//! and conversation turns, using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{user, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:switchboard.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a user
//!     let user = user::create_user(db.pool(), "bob@example.com", "Bob", None).await?;
//!     println!("created user {}", user.id);
//!
//!     Ok(())
//! }
//! ```

pub mod api_key;
pub mod call_session;
pub mod error;
pub mod models;
pub mod plan;
pub mod turn;
pub mod user;
pub mod validation;
pub mod voice;

pub use error::{DatabaseError, Result};
pub use models::{ApiKey, CallSession, SubscriptionPlan, Turn, TurnRole, User, Voice};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/switchboard.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing; use a pool size of 1 so every
    /// // query sees the same in-memory instance)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_key::ApiKeyUpdate;
    use crate::user::UserUpdate;

    async fn test_db() -> Database {
        // Pool size 1: every pooled connection would otherwise get its own
        // private in-memory database.
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_plan_create_and_list() {
        let db = test_db().await;
        let pool = db.pool();

        let basic = plan::create_plan(pool, "Basic", Some("Starter tier"), 999, Some(2), Some(100))
            .await
            .unwrap();
        assert_eq!(basic.name, "Basic");
        assert_eq!(basic.price_cents, 999);
        assert_eq!(basic.max_api_keys, Some(2));
        assert!(!basic.created_at.is_empty());

        let free = plan::create_plan(pool, "Free", None, 0, None, None)
            .await
            .unwrap();
        assert!(free.id > basic.id);
        assert_eq!(free.description, None);
        assert_eq!(free.max_api_keys, None);
        assert_eq!(free.max_monthly_calls, None);

        // Duplicate name conflicts, never upserts
        let result = plan::create_plan(pool, "Basic", None, 500, None, None).await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "SubscriptionPlan", .. })
        ));

        let plans = plan::list_plans(pool).await.unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].id, basic.id);
        assert_eq!(plans[1].id, free.id);
    }

    #[tokio::test]
    async fn test_user_create() {
        let db = test_db().await;
        let pool = db.pool();

        let alice = user::create_user(pool, "alice@example.com", "Alice", None)
            .await
            .unwrap();
        assert_eq!(alice.subscription_plan_id, None);
        assert_eq!(alice.created_at, alice.updated_at);

        // Duplicate email
        let result = user::create_user(pool, "alice@example.com", "Other", None).await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "User", .. })
        ));

        // Nonexistent plan: fails and persists nothing
        let result = user::create_user(pool, "bob@example.com", "Bob", Some(999)).await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "SubscriptionPlan", .. })
        ));
        assert_eq!(user::list_users(pool).await.unwrap().len(), 1);

        // With a real plan
        let plan = plan::create_plan(pool, "Basic", None, 999, Some(2), None)
            .await
            .unwrap();
        let bob = user::create_user(pool, "bob@example.com", "Bob", Some(plan.id))
            .await
            .unwrap();
        assert_eq!(bob.subscription_plan_id, Some(plan.id));
    }

    #[tokio::test]
    async fn test_user_update() {
        let db = test_db().await;
        let pool = db.pool();

        let plan = plan::create_plan(pool, "Basic", None, 999, None, None)
            .await
            .unwrap();
        let alice = user::create_user(pool, "alice@example.com", "Alice", Some(plan.id))
            .await
            .unwrap();
        user::create_user(pool, "bob@example.com", "Bob", None)
            .await
            .unwrap();

        // Unknown id
        let result = user::update_user(pool, 999, UserUpdate::default()).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        // Partial patch: only name changes
        let updated = user::update_user(
            pool,
            alice.id,
            UserUpdate {
                name: Some("Alicia".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.subscription_plan_id, Some(plan.id));

        // Explicitly clear the plan link
        let updated = user::update_user(
            pool,
            alice.id,
            UserUpdate {
                subscription_plan_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.subscription_plan_id, None);

        // Another user's email conflicts; the row is unchanged on read-back
        let result = user::update_user(
            pool,
            alice.id,
            UserUpdate {
                email: Some("bob@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
        let alice = user::get_user(pool, alice.id).await.unwrap();
        assert_eq!(alice.email, "alice@example.com");

        // Setting the same email back to yourself is not a conflict
        let updated = user::update_user(
            pool,
            alice.id,
            UserUpdate {
                email: Some("alice@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_api_key_quota() {
        let db = test_db().await;
        let pool = db.pool();

        let plan = plan::create_plan(pool, "Basic", None, 999, Some(2), None)
            .await
            .unwrap();
        let user = user::create_user(pool, "alice@example.com", "Alice", Some(plan.id))
            .await
            .unwrap();

        let k1 = api_key::create_api_key(pool, user.id, "hash-1", "first")
            .await
            .unwrap();
        assert!(k1.is_active);
        assert_eq!(k1.last_used_at, None);
        api_key::create_api_key(pool, user.id, "hash-2", "second")
            .await
            .unwrap();

        // Third key exceeds max_api_keys = 2
        let result = api_key::create_api_key(pool, user.id, "hash-3", "third").await;
        match result {
            Err(DatabaseError::ApiKeyQuotaExceeded { limit, .. }) => assert_eq!(limit, 2),
            other => panic!("expected quota error, got {:?}", other),
        }

        // Deactivating one key frees exactly one slot
        api_key::update_api_key(
            pool,
            k1.id,
            ApiKeyUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        api_key::create_api_key(pool, user.id, "hash-3", "third")
            .await
            .unwrap();
        let result = api_key::create_api_key(pool, user.id, "hash-4", "fourth").await;
        assert!(matches!(
            result,
            Err(DatabaseError::ApiKeyQuotaExceeded { .. })
        ));

        // Inactive keys still appear in the listing
        let keys = api_key::list_api_keys_for_user(pool, user.id).await.unwrap();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().any(|k| !k.is_active));
    }

    #[tokio::test]
    async fn test_api_key_quota_skipped_when_plan_missing() {
        let db = test_db().await;
        let pool = db.pool();

        let plan = plan::create_plan(pool, "Basic", None, 999, Some(1), None)
            .await
            .unwrap();
        let user = user::create_user(pool, "alice@example.com", "Alice", Some(plan.id))
            .await
            .unwrap();

        // No delete operation exists in the API surface; drop the plan row
        // out-of-band to produce a dangling reference.
        sqlx::query("DELETE FROM subscription_plans WHERE id = ?")
            .bind(plan.id)
            .execute(pool)
            .await
            .unwrap();

        // The limit of 1 no longer applies
        api_key::create_api_key(pool, user.id, "hash-1", "first")
            .await
            .unwrap();
        api_key::create_api_key(pool, user.id, "hash-2", "second")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_key_create_requires_user() {
        let db = test_db().await;

        let result = api_key::create_api_key(db.pool(), 42, "hash", "key").await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "User", .. })
        ));
        let result = api_key::list_api_keys_for_user(db.pool(), 42).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_api_key_update() {
        let db = test_db().await;
        let pool = db.pool();

        let user = user::create_user(pool, "alice@example.com", "Alice", None)
            .await
            .unwrap();
        let key = api_key::create_api_key(pool, user.id, "hash-1", "first")
            .await
            .unwrap();

        let updated = api_key::update_api_key(
            pool,
            key.id,
            ApiKeyUpdate {
                name: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "renamed");
        assert!(updated.is_active);
        // Immutable fields survive the update
        assert_eq!(updated.key_hash, key.key_hash);
        assert_eq!(updated.user_id, key.user_id);
        assert_eq!(updated.created_at, key.created_at);
        assert_eq!(updated.last_used_at, None);

        let result = api_key::update_api_key(pool, 999, ApiKeyUpdate::default()).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_voice_create_and_list() {
        let db = test_db().await;
        let pool = db.pool();

        voice::create_voice(pool, "Zoe", "provider/zoe", None)
            .await
            .unwrap();
        voice::create_voice(pool, "Amber", "provider/amber", Some("Warm alto"))
            .await
            .unwrap();

        let result = voice::create_voice(pool, "Other", "provider/zoe", None).await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "Voice", .. })
        ));

        // Ordered by name, not insertion
        let voices = voice::list_voices(pool).await.unwrap();
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0].name, "Amber");
        assert_eq!(voices[1].name, "Zoe");
    }

    #[tokio::test]
    async fn test_call_session_lifecycle() {
        let db = test_db().await;
        let pool = db.pool();

        let user = user::create_user(pool, "alice@example.com", "Alice", None)
            .await
            .unwrap();

        let result =
            call_session::create_call_session(pool, "CA1", 999, "2026-08-23T10:00:00Z").await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "User", .. })
        ));

        let session =
            call_session::create_call_session(pool, "CA1", user.id, "2026-08-23T10:00:00Z")
                .await
                .unwrap();
        assert_eq!(session.end_time, None);

        // Duplicate Twilio call ID
        let result =
            call_session::create_call_session(pool, "CA1", user.id, "2026-08-23T11:00:00Z").await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "CallSession", .. })
        ));

        let ended = call_session::end_call_session(pool, session.id, "2026-08-23T10:05:00Z")
            .await
            .unwrap();
        assert_eq!(ended.end_time.as_deref(), Some("2026-08-23T10:05:00Z"));
        assert_eq!(ended.start_time, session.start_time);

        // Ending twice fails regardless of the new end time
        let result = call_session::end_call_session(pool, session.id, "2026-08-23T12:00:00Z").await;
        assert!(matches!(
            result,
            Err(DatabaseError::SessionAlreadyEnded { .. })
        ));
        let unchanged = call_session::get_call_session(pool, session.id).await.unwrap();
        assert_eq!(unchanged.end_time.as_deref(), Some("2026-08-23T10:05:00Z"));

        let result = call_session::end_call_session(pool, 999, "2026-08-23T12:00:00Z").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let sessions = call_session::list_call_sessions_for_user(pool, user.id)
            .await
            .unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_turns() {
        let db = test_db().await;
        let pool = db.pool();

        let user = user::create_user(pool, "alice@example.com", "Alice", None)
            .await
            .unwrap();
        let session =
            call_session::create_call_session(pool, "CA1", user.id, "2026-08-23T10:00:00Z")
                .await
                .unwrap();

        let result = turn::create_turn(pool, 999, TurnRole::User, Some("hi"), None).await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "CallSession", .. })
        ));

        let t1 = turn::create_turn(pool, session.id, TurnRole::User, Some("hello"), None)
            .await
            .unwrap();
        assert_eq!(t1.role, TurnRole::User);
        assert_eq!(t1.latency_ms, None);
        let t2 = turn::create_turn(pool, session.id, TurnRole::Assistant, Some("hi!"), Some(230))
            .await
            .unwrap();
        let t3 = turn::create_turn(pool, session.id, TurnRole::Tool, None, Some(12))
            .await
            .unwrap();
        assert_eq!(t3.text, None);

        call_session::end_call_session(pool, session.id, "2026-08-23T10:05:00Z")
            .await
            .unwrap();

        // No turns after the session ends
        let result = turn::create_turn(pool, session.id, TurnRole::User, Some("late"), None).await;
        assert!(matches!(result, Err(DatabaseError::SessionEnded { .. })));

        // Earliest first, id as tie-break within the same timestamp
        let turns = turn::list_turns_for_call_session(pool, session.id)
            .await
            .unwrap();
        assert_eq!(
            turns.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![t1.id, t2.id, t3.id]
        );
        let mut sorted = turns.clone();
        sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        assert_eq!(sorted, turns);
    }
}
