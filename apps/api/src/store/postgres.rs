use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::history::{AiHistoryRow, AtsHistoryRow};
use crate::models::resume::{ResumeRow, ResumeUpdate};
use crate::models::subscription::Subscription;
use crate::plans::{enforce_quota, enforce_resume_quota, Plan, UsageKind};
use crate::store::Store;

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SubscriptionRow {
    user_id: Uuid,
    plan: String,
    status: String,
    usage_ai: i32,
    usage_ats: i32,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        let plan = row.plan.parse::<Plan>().unwrap_or_else(|e| {
            warn!("Subscription for {} has {e}; treating as free", row.user_id);
            Plan::Free
        });
        Subscription {
            user_id: row.user_id,
            plan,
            status: row.status,
            usage_ai: row.usage_ai.max(0) as u32,
            usage_ats: row.usage_ats.max(0) as u32,
        }
    }
}

fn usage_column(kind: UsageKind) -> &'static str {
    match kind {
        UsageKind::Ai => "usage_ai",
        UsageKind::Ats => "usage_ats",
    }
}

/// Creates the user's free-plan row if missing, then locks it until `tx` ends.
async fn lock_subscription(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<SubscriptionRow, sqlx::Error> {
    sqlx::query("INSERT INTO subscriptions (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query_as::<_, SubscriptionRow>(
        "SELECT user_id, plan, status, usage_ai, usage_ats FROM subscriptions \
         WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
}

#[async_trait]
impl Store for PgStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_resume(&self, resume: &ResumeRow) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // The subscription row lock serializes resume creation per user.
        let plan = Subscription::from(lock_subscription(&mut tx, resume.user_id).await?).plan;
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
            .bind(resume.user_id)
            .fetch_one(&mut *tx)
            .await?;
        enforce_resume_quota(plan, existing.max(0) as usize)?;

        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, title, template, personal_info, experience, education,
                 skills, projects, certifications, languages, content, ats_score,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.title)
        .bind(&resume.template)
        .bind(&resume.personal_info)
        .bind(&resume.experience)
        .bind(&resume.education)
        .bind(&resume.skills)
        .bind(&resume.projects)
        .bind(&resume.certifications)
        .bind(&resume.languages)
        .bind(&resume.content)
        .bind(resume.ats_score)
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
    ) -> Result<Option<ResumeRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
                .bind(resume_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        update: &ResumeUpdate,
    ) -> Result<Option<ResumeRow>, AppError> {
        let title = update.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let template = update
            .template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes SET
                title = COALESCE($1, title),
                template = COALESCE($2, template),
                personal_info = $3,
                experience = $4,
                education = $5,
                skills = $6,
                projects = $7,
                certifications = $8,
                languages = $9,
                content = $10,
                updated_at = NOW()
            WHERE id = $11 AND user_id = $12
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(template)
        .bind(&update.personal_info)
        .bind(&update.experience)
        .bind(&update.education)
        .bind(&update.skills)
        .bind(&update.projects)
        .bind(&update.certifications)
        .bind(&update.languages)
        .bind(&update.content)
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(resume_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_ats_score(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        ats_score: i32,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE resumes SET ats_score = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3",
        )
        .bind(ats_score)
        .bind(resume_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn subscription(&self, user_id: Uuid) -> Result<Subscription, AppError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            "SELECT user_id, plan, status, usage_ai, usage_ats FROM subscriptions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row
            .map(Subscription::from)
            .unwrap_or_else(|| Subscription::free(user_id)))
    }

    async fn reserve_usage(&self, user_id: Uuid, kind: UsageKind) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let subscription = Subscription::from(lock_subscription(&mut tx, user_id).await?);
        // Dropping the transaction on a quota error rolls it back.
        enforce_quota(&subscription, kind)?;

        let column = usage_column(kind);
        sqlx::query(&format!(
            "UPDATE subscriptions SET {column} = {column} + 1 WHERE user_id = $1"
        ))
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn release_usage(&self, user_id: Uuid, kind: UsageKind) -> Result<(), AppError> {
        let column = usage_column(kind);
        sqlx::query(&format!(
            "UPDATE subscriptions SET {column} = GREATEST({column} - 1, 0) WHERE user_id = $1"
        ))
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append_ats_history(&self, row: &AtsHistoryRow) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO ats_history (id, user_id, resume_id, score, report, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.resume_id)
        .bind(row.score)
        .bind(&row.report)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ats_history(&self, user_id: Uuid) -> Result<Vec<AtsHistoryRow>, AppError> {
        Ok(sqlx::query_as::<_, AtsHistoryRow>(
            "SELECT * FROM ats_history WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn append_ai_history(&self, row: &AiHistoryRow) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO ai_history
                (id, user_id, section, original_content, improved_content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(&row.section)
        .bind(&row.original_content)
        .bind(&row.improved_content)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ai_history(&self, user_id: Uuid) -> Result<Vec<AiHistoryRow>, AppError> {
        Ok(sqlx::query_as::<_, AiHistoryRow>(
            "SELECT * FROM ai_history WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(plan: &str) -> SubscriptionRow {
        SubscriptionRow {
            user_id: Uuid::new_v4(),
            plan: plan.to_string(),
            status: "active".to_string(),
            usage_ai: 3,
            usage_ats: -1,
        }
    }

    #[test]
    fn test_subscription_row_parses_plan() {
        let sub = Subscription::from(row("premium"));
        assert_eq!(sub.plan, Plan::Premium);
        assert_eq!(sub.usage_ai, 3);
        assert_eq!(sub.usage_ats, 0);
    }

    #[test]
    fn test_usage_columns_match_schema() {
        assert_eq!(usage_column(UsageKind::Ai), "usage_ai");
        assert_eq!(usage_column(UsageKind::Ats), "usage_ats");
    }

    #[test]
    fn test_unknown_plan_falls_back_to_free() {
        assert_eq!(Subscription::from(row("enterprise")).plan, Plan::Free);
    }
}
