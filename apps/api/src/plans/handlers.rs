//! Axum route handlers for plans and subscriptions.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::extract::AppQuery;
use crate::models::subscription::Subscription;
use crate::plans::catalog::{plan_catalog, PlanInfo};
use crate::plans::PlanLimits;
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub success: bool,
    pub plans: Vec<PlanInfo>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub success: bool,
    pub subscription: Subscription,
    pub limits: PlanLimits,
}

/// GET /api/plans
pub async fn handle_list_plans() -> Json<PlansResponse> {
    Json(PlansResponse {
        success: true,
        plans: plan_catalog(),
    })
}

/// GET /api/subscription
pub async fn handle_get_subscription(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let subscription = state.store.subscription(params.user_id).await?;
    let limits = subscription.plan.limits();
    Ok(Json(SubscriptionResponse {
        success: true,
        subscription,
        limits,
    }))
}
