//! User routes.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use database::models::User;
use database::user::UserUpdate;
use database::validation;

use crate::error::Result;
use crate::routes::double_option;
use crate::state::AppState;

/// Request to create a user.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub subscription_plan_id: Option<i64>,
}

/// Request to update a user. Absent fields keep their current value;
/// `subscription_plan_id` may be set to null to clear the plan link.
#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub subscription_plan_id: Option<Option<i64>>,
}

/// Create a user.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>> {
    validation::validate_email(&req.email)?;
    validation::validate_text("name", &req.name)?;

    let user = database::user::create_user(
        state.db.pool(),
        &req.email,
        &req.name,
        req.subscription_plan_id,
    )
    .await?;

    info!(user_id = user.id, "Created user");
    Ok(Json(user))
}

/// List all users.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = database::user::list_users(state.db.pool()).await?;
    Ok(Json(users))
}

/// Apply a partial update to a user.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    if let Some(email) = &req.email {
        validation::validate_email(email)?;
    }
    if let Some(name) = &req.name {
        validation::validate_text("name", name)?;
    }

    let update = UserUpdate {
        email: req.email,
        name: req.name,
        subscription_plan_id: req.subscription_plan_id,
    };
    let user = database::user::update_user(state.db.pool(), id, update).await?;

    info!(user_id = user.id, "Updated user");
    Ok(Json(user))
}
