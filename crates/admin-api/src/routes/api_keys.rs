//! API key routes.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use database::api_key::ApiKeyUpdate;
use database::models::ApiKey;
use database::validation;

use crate::error::Result;
use crate::state::AppState;

/// Request to create an API key.
#[derive(Deserialize)]
pub struct CreateApiKeyRequest {
    pub user_id: i64,
    pub key_hash: String,
    pub name: String,
}

/// Request to update an API key. Only the name and active flag may change.
#[derive(Deserialize, Default)]
pub struct UpdateApiKeyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Create an API key for a user, subject to the plan quota.
pub async fn create_api_key(
    State(state): State<AppState>,
    Json(req): Json<CreateApiKeyRequest>,
) -> Result<Json<ApiKey>> {
    validation::validate_text("key_hash", &req.key_hash)?;
    validation::validate_text("name", &req.name)?;

    let key =
        database::api_key::create_api_key(state.db.pool(), req.user_id, &req.key_hash, &req.name)
            .await?;

    info!(api_key_id = key.id, user_id = key.user_id, "Created API key");
    Ok(Json(key))
}

/// List all keys for a user, active and inactive.
pub async fn list_api_keys(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ApiKey>>> {
    let keys = database::api_key::list_api_keys_for_user(state.db.pool(), user_id).await?;
    Ok(Json(keys))
}

/// Apply a partial update to an API key.
pub async fn update_api_key(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKey>> {
    if let Some(name) = &req.name {
        validation::validate_text("name", name)?;
    }

    let update = ApiKeyUpdate {
        name: req.name,
        is_active: req.is_active,
    };
    let key = database::api_key::update_api_key(state.db.pool(), id, update).await?;

    info!(api_key_id = key.id, "Updated API key");
    Ok(Json(key))
}
