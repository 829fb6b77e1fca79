//! Voice library routes.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use database::models::Voice;
use database::validation;

use crate::error::Result;
use crate::state::AppState;

/// Request to create a voice entry.
#[derive(Deserialize)]
pub struct CreateVoiceRequest {
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Create a voice entry.
pub async fn create_voice(
    State(state): State<AppState>,
    Json(req): Json<CreateVoiceRequest>,
) -> Result<Json<Voice>> {
    validation::validate_text("name", &req.name)?;
    validation::validate_text("identifier", &req.identifier)?;

    let voice = database::voice::create_voice(
        state.db.pool(),
        &req.name,
        &req.identifier,
        req.description.as_deref(),
    )
    .await?;

    info!(voice_id = voice.id, identifier = %voice.identifier, "Created voice");
    Ok(Json(voice))
}

/// List all voices ordered by name.
pub async fn list_voices(State(state): State<AppState>) -> Result<Json<Vec<Voice>>> {
    let voices = database::voice::list_voices(state.db.pool()).await?;
    Ok(Json(voices))
}
