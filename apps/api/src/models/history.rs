use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::ats::scorer::ScoreReport;

/// One ATS run, stored verbatim with the report that was returned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AtsHistoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub score: i32,
    pub report: Value,
    pub created_at: DateTime<Utc>,
}

impl AtsHistoryRow {
    pub fn new(
        user_id: Uuid,
        resume_id: Option<Uuid>,
        report: &ScoreReport,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            resume_id,
            score: report.ats_score as i32,
            report: serde_json::to_value(report)?,
            created_at: Utc::now(),
        })
    }
}

/// One AI rewrite of a resume section.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AiHistoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub section: String,
    pub original_content: String,
    pub improved_content: String,
    pub created_at: DateTime<Utc>,
}

impl AiHistoryRow {
    pub fn new(user_id: Uuid, section: &str, original: &str, improved: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            section: section.to_string(),
            original_content: original.to_string(),
            improved_content: improved.to_string(),
            created_at: Utc::now(),
        }
    }
}
