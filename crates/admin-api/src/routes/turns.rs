//! Conversation turn routes.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use database::models::{Turn, TurnRole};

use crate::error::Result;
use crate::state::AppState;

/// Request to append a turn to an open call session. An unknown role is
/// rejected by the JSON extractor before the handler runs.
#[derive(Deserialize)]
pub struct CreateTurnRequest {
    pub call_session_id: i64,
    pub role: TurnRole,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub latency_ms: Option<i64>,
}

/// Append a turn to an open call session.
pub async fn create_turn(
    State(state): State<AppState>,
    Json(req): Json<CreateTurnRequest>,
) -> Result<Json<Turn>> {
    let turn = database::turn::create_turn(
        state.db.pool(),
        req.call_session_id,
        req.role,
        req.text.as_deref(),
        req.latency_ms,
    )
    .await?;

    info!(
        turn_id = turn.id,
        call_session_id = turn.call_session_id,
        role = turn.role.as_str(),
        "Created turn"
    );
    Ok(Json(turn))
}

/// List all turns for a call session, earliest first.
pub async fn list_turns(
    State(state): State<AppState>,
    Path(call_session_id): Path<i64>,
) -> Result<Json<Vec<Turn>>> {
    let turns =
        database::turn::list_turns_for_call_session(state.db.pool(), call_session_id).await?;
    Ok(Json(turns))
}
