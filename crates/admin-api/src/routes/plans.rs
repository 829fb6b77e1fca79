//! Subscription plan routes.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use database::models::SubscriptionPlan;
use database::validation;

use crate::error::Result;
use crate::state::AppState;

/// Request to create a subscription plan.
#[derive(Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub max_api_keys: Option<i64>,
    #[serde(default)]
    pub max_monthly_calls: Option<i64>,
}

/// Plan as returned to callers, with the price as an ordinary number.
#[derive(Serialize)]
pub struct PlanResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub max_api_keys: Option<i64>,
    pub max_monthly_calls: Option<i64>,
    pub created_at: String,
}

impl From<SubscriptionPlan> for PlanResponse {
    fn from(plan: SubscriptionPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            price: validation::cents_to_price(plan.price_cents),
            max_api_keys: plan.max_api_keys,
            max_monthly_calls: plan.max_monthly_calls,
            created_at: plan.created_at,
        }
    }
}

/// Create a subscription plan.
pub async fn create_plan(
    State(state): State<AppState>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<Json<PlanResponse>> {
    validation::validate_text("name", &req.name)?;
    let price_cents = validation::price_to_cents(req.price)?;
    validation::validate_limit("max_api_keys", req.max_api_keys)?;
    validation::validate_limit("max_monthly_calls", req.max_monthly_calls)?;

    let plan = database::plan::create_plan(
        state.db.pool(),
        &req.name,
        req.description.as_deref(),
        price_cents,
        req.max_api_keys,
        req.max_monthly_calls,
    )
    .await?;

    info!(plan_id = plan.id, name = %plan.name, "Created subscription plan");
    Ok(Json(plan.into()))
}

/// List all subscription plans.
pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<PlanResponse>>> {
    let plans = database::plan::list_plans(state.db.pool()).await?;
    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}
