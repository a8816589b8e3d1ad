//! Axum route handlers for ATS testing.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ats::scorer::{score, ScoreInput, ScoreReport};
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::history::AtsHistoryRow;
use crate::plans::UsageKind;
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::store::metered;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsTestRequest {
    pub user_id: Uuid,
    pub resume_content: Option<String>,
    pub job_description: Option<String>,
    pub resume_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AtsTestResponse {
    pub success: bool,
    pub report: ScoreReport,
}

/// POST /api/ats/test
///
/// Scores resume text against a job description. Input is validated before
/// any quota is taken; a failure after scoring returns the reserved unit.
pub async fn handle_ats_test(
    State(state): State<AppState>,
    AppJson(request): AppJson<AtsTestRequest>,
) -> Result<Json<AtsTestResponse>, AppError> {
    let input = ScoreInput::new(
        request.resume_content.as_deref().unwrap_or_default(),
        request.job_description.as_deref().unwrap_or_default(),
    )?;
    let user_id = request.user_id;

    let report = metered(state.store.as_ref(), user_id, UsageKind::Ats, async {
        let report = score(&input);

        if let Some(resume_id) = request.resume_id {
            let updated = state
                .store
                .set_ats_score(user_id, resume_id, report.ats_score as i32)
                .await?;
            if !updated {
                warn!("ATS score not saved: resume {resume_id} not found for user {user_id}");
            }
        }

        let history = AtsHistoryRow::new(user_id, request.resume_id, &report)
            .map_err(|e| AppError::Internal(e.into()))?;
        state.store.append_ats_history(&history).await?;
        Ok::<_, AppError>(report)
    })
    .await?;

    info!(
        "ATS score {} for user {} ({}/{} keywords)",
        report.ats_score, user_id, report.keyword.matches, report.keyword.total_keywords
    );

    Ok(Json(AtsTestResponse {
        success: true,
        report,
    }))
}

/// GET /api/ats/history
pub async fn handle_ats_history(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<AtsHistoryRow>>, AppError> {
    Ok(Json(state.store.ats_history(params.user_id).await?))
}
