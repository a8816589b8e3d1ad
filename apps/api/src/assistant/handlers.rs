//! Axum route handlers for the AI assistant.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::history::AiHistoryRow;
use crate::plans::UsageKind;
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::store::metered;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub user_id: Uuid,
    pub section: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub success: bool,
    pub improved: String,
    pub suggestions: Vec<String>,
}

/// POST /api/ai/suggestions
///
/// Rewrites a resume section and returns improvement suggestions.
/// The user is charged only when both model calls succeed.
pub async fn handle_suggestions(
    State(state): State<AppState>,
    AppJson(request): AppJson<SuggestionRequest>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let section = required_text(request.section.as_deref(), "section")?;
    let content = required_text(request.content.as_deref(), "content")?;
    let user_id = request.user_id;

    let rewriter = state.rewriter.as_ref().ok_or(AppError::AiUnavailable)?;

    let (improved, suggestions) = metered(state.store.as_ref(), user_id, UsageKind::Ai, async {
        let improved = rewriter.improve(section, content).await?;
        let suggestions = rewriter.suggest(section, content).await?;
        state
            .store
            .append_ai_history(&AiHistoryRow::new(user_id, section, content, &improved))
            .await?;
        Ok::<_, AppError>((improved, suggestions))
    })
    .await?;

    info!(
        "AI rewrite for user {user_id} section '{section}' ({} suggestions)",
        suggestions.len()
    );

    Ok(Json(SuggestionResponse {
        success: true,
        improved,
        suggestions,
    }))
}

/// GET /api/ai/history
pub async fn handle_ai_history(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<AiHistoryRow>>, AppError> {
    Ok(Json(state.store.ai_history(params.user_id).await?))
}

fn required_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}
