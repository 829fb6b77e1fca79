//! Call session routes.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use database::models::CallSession;
use database::validation;

use crate::error::Result;
use crate::state::AppState;

/// Request to create a call session.
#[derive(Deserialize)]
pub struct CreateCallSessionRequest {
    pub twilio_call_id: String,
    pub user_id: i64,
    pub start_time: String,
}

/// Request to end a call session.
#[derive(Deserialize)]
pub struct EndCallSessionRequest {
    pub end_time: String,
}

/// Create a call session for a user.
pub async fn create_call_session(
    State(state): State<AppState>,
    Json(req): Json<CreateCallSessionRequest>,
) -> Result<Json<CallSession>> {
    validation::validate_text("twilio_call_id", &req.twilio_call_id)?;
    validation::validate_text("start_time", &req.start_time)?;

    let session = database::call_session::create_call_session(
        state.db.pool(),
        &req.twilio_call_id,
        req.user_id,
        &req.start_time,
    )
    .await?;

    info!(
        call_session_id = session.id,
        twilio_call_id = %session.twilio_call_id,
        "Created call session"
    );
    Ok(Json(session))
}

/// End an open call session.
pub async fn end_call_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EndCallSessionRequest>,
) -> Result<Json<CallSession>> {
    validation::validate_text("end_time", &req.end_time)?;

    let session =
        database::call_session::end_call_session(state.db.pool(), id, &req.end_time).await?;

    info!(call_session_id = session.id, "Ended call session");
    Ok(Json(session))
}

/// List every session for a user, open or ended.
pub async fn list_call_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CallSession>>> {
    let sessions =
        database::call_session::list_call_sessions_for_user(state.db.pool(), user_id).await?;
    Ok(Json(sessions))
}
