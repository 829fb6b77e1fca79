//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A subscription pricing tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SubscriptionPlan {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Plan name, unique across all plans.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Price in minor units (cents).
    pub price_cents: i64,
    /// Maximum number of active API keys; `None` means unlimited.
    pub max_api_keys: Option<i64>,
    /// Maximum calls per month; `None` means unlimited.
    pub max_monthly_calls: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Email address, unique across all users.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Subscription plan, if any. Checked against the plans table at creation
    /// time only, so the reference can dangle after a plan is removed.
    pub subscription_plan_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp. Equals `created_at` until the first update.
    pub updated_at: String,
}

/// An API key issued to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ApiKey {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Hash of the key material.
    pub key_hash: String,
    /// Display name.
    pub name: String,
    /// Whether the key counts toward the plan quota and may authenticate.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// When the key last authenticated a request, if ever.
    pub last_used_at: Option<String>,
}

/// A voice available for calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Voice {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Provider identifier, unique across all voices.
    pub identifier: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// A phone call session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CallSession {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Twilio call identifier, unique across all sessions.
    pub twilio_call_id: String,
    /// Owning user.
    pub user_id: i64,
    /// When the call started.
    pub start_time: String,
    /// When the call ended; `None` while the session is open.
    pub end_time: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// One message within a call session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Turn {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning call session.
    pub call_session_id: i64,
    /// Who produced the turn.
    pub role: TurnRole,
    /// Transcribed or generated text, if any.
    pub text: Option<String>,
    /// Processing latency in milliseconds, if measured.
    pub latency_ms: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Who produced a turn. Stored as lowercase text; anything outside these three
/// values is rejected at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
    Tool,
}

impl TurnRole {
    /// Lowercase wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::Tool => "tool",
        }
    }
}
