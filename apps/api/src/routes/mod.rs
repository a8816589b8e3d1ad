pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::assistant::handlers as assistant;
use crate::ats::handlers as ats;
use crate::plans::handlers as plans;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Identifies the calling user on read and delete endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Plans
        .route("/api/plans", get(plans::handle_list_plans))
        .route("/api/subscription", get(plans::handle_get_subscription))
        // Resumes
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        // ATS
        .route("/api/ats/test", post(ats::handle_ats_test))
        .route("/api/ats/history", get(ats::handle_ats_history))
        // AI assistant
        .route("/api/ai/suggestions", post(assistant::handle_suggestions))
        .route("/api/ai/history", get(assistant::handle_ai_history))
        .with_state(state)
}
