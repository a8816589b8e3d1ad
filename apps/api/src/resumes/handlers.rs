//! Axum route handlers for the Resume API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::resume::{ResumeRow, ResumeUpdate};
use crate::routes::UserIdQuery;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeResponse {
    pub success: bool,
    pub resume_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResumeRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub update: ResumeUpdate,
}

#[derive(Debug, Serialize)]
pub struct UpdateResumeResponse {
    pub success: bool,
    pub resume: ResumeRow,
}

#[derive(Debug, Serialize)]
pub struct DeleteResumeResponse {
    pub success: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(state.store.list_resumes(params.user_id).await?))
}

/// POST /api/resumes
///
/// Creates a blank resume, subject to the plan's resume allowance.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateResumeRequest>,
) -> Result<Json<CreateResumeResponse>, AppError> {
    let resume = ResumeRow::new(
        request.user_id,
        request.title.as_deref(),
        request.template.as_deref(),
    );
    state.store.insert_resume(&resume).await?;

    info!("Created resume {} for user {}", resume.id, request.user_id);

    Ok(Json(CreateResumeResponse {
        success: true,
        resume_id: resume.id,
    }))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AppPath(resume_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    state
        .store
        .get_resume(params.user_id, resume_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(resume_id))
}

/// PUT /api/resumes/:id
///
/// Replaces all content sections. Omitted sections are cleared.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    AppPath(resume_id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateResumeRequest>,
) -> Result<Json<UpdateResumeResponse>, AppError> {
    let update = request.update.normalize().map_err(AppError::Validation)?;

    let resume = state
        .store
        .update_resume(request.user_id, resume_id, &update)
        .await?
        .ok_or_else(|| not_found(resume_id))?;

    Ok(Json(UpdateResumeResponse {
        success: true,
        resume,
    }))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AppPath(resume_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<DeleteResumeResponse>, AppError> {
    if !state.store.delete_resume(params.user_id, resume_id).await? {
        return Err(not_found(resume_id));
    }
    info!("Deleted resume {resume_id} for user {}", params.user_id);
    Ok(Json(DeleteResumeResponse { success: true }))
}

fn not_found(resume_id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {resume_id} not found"))
}
