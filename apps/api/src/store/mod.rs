//! Storage capability injected into handlers via `AppState`.
//!
//! Two backends: `MemoryStore` (process-local, used when no database is
//! configured and in tests) and `PgStore` (Postgres via sqlx).

pub mod memory;
pub mod postgres;

use std::future::Future;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::history::{AiHistoryRow, AtsHistoryRow};
use crate::models::resume::{ResumeRow, ResumeUpdate};
use crate::models::subscription::Subscription;
use crate::plans::UsageKind;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Every resume operation is scoped to its owner: a resume that exists but
/// belongs to another user behaves exactly like a missing one.
#[async_trait]
pub trait Store: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    // Resumes
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError>;
    /// Inserts a resume unless the owner's plan allowance is used up.
    /// Counting and inserting happen atomically per user.
    async fn insert_resume(&self, resume: &ResumeRow) -> Result<(), AppError>;
    async fn get_resume(&self, user_id: Uuid, resume_id: Uuid)
        -> Result<Option<ResumeRow>, AppError>;
    async fn update_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        update: &ResumeUpdate,
    ) -> Result<Option<ResumeRow>, AppError>;
    async fn delete_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<bool, AppError>;
    async fn set_ats_score(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        ats_score: i32,
    ) -> Result<bool, AppError>;

    // Subscriptions
    async fn subscription(&self, user_id: Uuid) -> Result<Subscription, AppError>;
    /// Checks the plan quota and takes one unit of `kind` in a single step.
    /// Fails with `AppError::PlanLimit` when the quota is exhausted.
    async fn reserve_usage(&self, user_id: Uuid, kind: UsageKind) -> Result<(), AppError>;
    /// Gives back a unit taken by `reserve_usage`.
    async fn release_usage(&self, user_id: Uuid, kind: UsageKind) -> Result<(), AppError>;

    // History, newest first
    async fn append_ats_history(&self, row: &AtsHistoryRow) -> Result<(), AppError>;
    async fn ats_history(&self, user_id: Uuid) -> Result<Vec<AtsHistoryRow>, AppError>;
    async fn append_ai_history(&self, row: &AiHistoryRow) -> Result<(), AppError>;
    async fn ai_history(&self, user_id: Uuid) -> Result<Vec<AiHistoryRow>, AppError>;
}

/// Runs a metered operation. Usage is reserved up front so concurrent
/// requests cannot overshoot the quota, and released again if the operation
/// fails, so only successful operations are charged.
pub async fn metered<T, F>(
    store: &dyn Store,
    user_id: Uuid,
    kind: UsageKind,
    operation: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    store.reserve_usage(user_id, kind).await?;
    let outcome = operation.await;
    if outcome.is_err() {
        if let Err(e) = store.release_usage(user_id, kind).await {
            warn!("Failed to release {kind:?} usage for user {user_id}: {e}");
        }
    }
    outcome
}
