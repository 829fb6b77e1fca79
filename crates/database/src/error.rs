//! Database error types.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record already exists
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// Attempt to end a call session that already has an end time
    #[error("call session {id} already ended")]
    SessionAlreadyEnded { id: i64 },

    /// Attempt to append a turn to a call session that has ended
    #[error("cannot add turn to ended call session {id}")]
    SessionEnded { id: i64 },

    /// Active API key count is at the subscription plan's limit
    #[error("API key limit reached for user {user_id} (maximum allowed: {limit})")]
    ApiKeyQuotaExceeded { user_id: i64, limit: i64 },
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
