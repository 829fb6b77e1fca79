//! Route handlers for the admin API.

pub mod api_keys;
pub mod call_sessions;
pub mod health;
pub mod plans;
pub mod turns;
pub mod users;
pub mod voices;

use axum::routing::{get, patch, post};
use axum::Router;
use serde::{Deserialize, Deserializer};

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Subscription plans
        .route(
            "/api/subscription-plans",
            get(plans::list_plans).post(plans::create_plan),
        )
        // Users
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id", patch(users::update_user))
        .route("/api/users/:id/api-keys", get(api_keys::list_api_keys))
        .route(
            "/api/users/:id/call-sessions",
            get(call_sessions::list_call_sessions),
        )
        // API keys
        .route("/api/api-keys", post(api_keys::create_api_key))
        .route("/api/api-keys/:id", patch(api_keys::update_api_key))
        // Voices
        .route(
            "/api/voices",
            get(voices::list_voices).post(voices::create_voice),
        )
        // Call sessions and turns
        .route("/api/call-sessions", post(call_sessions::create_call_session))
        .route(
            "/api/call-sessions/:id/end",
            post(call_sessions::end_call_session),
        )
        .route("/api/call-sessions/:id/turns", get(turns::list_turns))
        .route("/api/turns", post(turns::create_turn))
}

/// Deserialize a nullable patch field so an absent key (`None`) is
/// distinguishable from an explicit null (`Some(None)`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
