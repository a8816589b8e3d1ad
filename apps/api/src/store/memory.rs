use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::history::{AiHistoryRow, AtsHistoryRow};
use crate::models::resume::{ResumeRow, ResumeUpdate};
use crate::models::subscription::Subscription;
use crate::plans::{enforce_quota, enforce_resume_quota, UsageKind};
use crate::store::Store;

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    resumes: RwLock<HashMap<Uuid, ResumeRow>>,
    subscriptions: RwLock<HashMap<Uuid, Subscription>>,
    ats_history: RwLock<Vec<AtsHistoryRow>>,
    ai_history: RwLock<Vec<AiHistoryRow>>,
}

impl MemoryStore {
    #[cfg(test)]
    pub async fn set_plan(&self, user_id: Uuid, plan: crate::plans::Plan) {
        self.subscriptions
            .write()
            .await
            .entry(user_id)
            .or_insert_with(|| Subscription::free(user_id))
            .plan = plan;
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        let mut rows: Vec<ResumeRow> = self
            .resumes
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_resume(&self, resume: &ResumeRow) -> Result<(), AppError> {
        let plan = self.subscription(resume.user_id).await?.plan;
        let mut resumes = self.resumes.write().await;
        let existing = resumes
            .values()
            .filter(|r| r.user_id == resume.user_id)
            .count();
        enforce_resume_quota(plan, existing)?;
        resumes.insert(resume.id, resume.clone());
        Ok(())
    }

    async fn get_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
    ) -> Result<Option<ResumeRow>, AppError> {
        Ok(self
            .resumes
            .read()
            .await
            .get(&resume_id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn update_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        update: &ResumeUpdate,
    ) -> Result<Option<ResumeRow>, AppError> {
        let mut resumes = self.resumes.write().await;
        Ok(resumes
            .get_mut(&resume_id)
            .filter(|r| r.user_id == user_id)
            .map(|r| {
                r.apply(update);
                r.clone()
            }))
    }

    async fn delete_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<bool, AppError> {
        let mut resumes = self.resumes.write().await;
        match resumes.get(&resume_id) {
            Some(r) if r.user_id == user_id => {
                resumes.remove(&resume_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_ats_score(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        ats_score: i32,
    ) -> Result<bool, AppError> {
        let mut resumes = self.resumes.write().await;
        match resumes.get_mut(&resume_id) {
            Some(r) if r.user_id == user_id => {
                r.ats_score = ats_score;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn subscription(&self, user_id: Uuid) -> Result<Subscription, AppError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Subscription::free(user_id)))
    }

    async fn reserve_usage(&self, user_id: Uuid, kind: UsageKind) -> Result<(), AppError> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions
            .entry(user_id)
            .or_insert_with(|| Subscription::free(user_id));
        enforce_quota(subscription, kind)?;
        subscription.record(kind);
        Ok(())
    }

    async fn release_usage(&self, user_id: Uuid, kind: UsageKind) -> Result<(), AppError> {
        if let Some(subscription) = self.subscriptions.write().await.get_mut(&user_id) {
            subscription.release(kind);
        }
        Ok(())
    }

    async fn append_ats_history(&self, row: &AtsHistoryRow) -> Result<(), AppError> {
        self.ats_history.write().await.push(row.clone());
        Ok(())
    }

    async fn ats_history(&self, user_id: Uuid) -> Result<Vec<AtsHistoryRow>, AppError> {
        Ok(self
            .ats_history
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append_ai_history(&self, row: &AiHistoryRow) -> Result<(), AppError> {
        self.ai_history.write().await.push(row.clone());
        Ok(())
    }

    async fn ai_history(&self, user_id: Uuid) -> Result<Vec<AiHistoryRow>, AppError> {
        Ok(self
            .ai_history
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::Plan;

    #[tokio::test]
    async fn test_resumes_are_scoped_to_owner() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let resume = ResumeRow::new(owner, Some("Mine"), None);
        store.insert_resume(&resume).await.unwrap();

        assert!(store.get_resume(owner, resume.id).await.unwrap().is_some());
        assert!(store.get_resume(stranger, resume.id).await.unwrap().is_none());
        assert!(!store.delete_resume(stranger, resume.id).await.unwrap());
        assert!(!store.set_ats_score(stranger, resume.id, 99).await.unwrap());
        assert_eq!(store.list_resumes(owner).await.unwrap().len(), 1);
        assert!(store.list_resumes(stranger).await.unwrap().is_empty());

        assert!(store.delete_resume(owner, resume.id).await.unwrap());
        assert!(store.get_resume(owner, resume.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_sections() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let resume = ResumeRow::new(owner, None, None);
        store.insert_resume(&resume).await.unwrap();

        let update: ResumeUpdate =
            serde_json::from_value(serde_json::json!({ "skills": ["Go"] })).unwrap();
        let updated = store
            .update_resume(owner, resume.id, &update.normalize().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.skills, serde_json::json!(["Go"]));
        assert!(updated.updated_at >= resume.updated_at);
    }

    #[tokio::test]
    async fn test_unknown_user_is_on_free_plan() {
        let store = MemoryStore::default();
        let sub = store.subscription(Uuid::new_v4()).await.unwrap();
        assert_eq!(sub.plan, Plan::Free);
        assert_eq!(sub.usage_ats, 0);
    }

    #[tokio::test]
    async fn test_reserve_usage_keeps_plan() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        store.set_plan(user, Plan::Pro).await;
        store.reserve_usage(user, UsageKind::Ats).await.unwrap();
        store.reserve_usage(user, UsageKind::Ats).await.unwrap();
        store.reserve_usage(user, UsageKind::Ai).await.unwrap();

        let sub = store.subscription(user).await.unwrap();
        assert_eq!(sub.plan, Plan::Pro);
        assert_eq!(sub.usage_ats, 2);
        assert_eq!(sub.usage_ai, 1);
    }

    #[tokio::test]
    async fn test_reserve_usage_stops_at_plan_limit() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        for _ in 0..5 {
            store.reserve_usage(user, UsageKind::Ai).await.unwrap();
        }
        let err = store.reserve_usage(user, UsageKind::Ai).await.unwrap_err();
        assert!(matches!(err, AppError::PlanLimit(_)));
        assert_eq!(store.subscription(user).await.unwrap().usage_ai, 5);

        store.release_usage(user, UsageKind::Ai).await.unwrap();
        store.reserve_usage(user, UsageKind::Ai).await.unwrap();
        assert_eq!(store.subscription(user).await.unwrap().usage_ai, 5);
    }

    #[tokio::test]
    async fn test_release_usage_never_goes_negative() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        store.release_usage(user, UsageKind::Ats).await.unwrap();
        store.reserve_usage(user, UsageKind::Ats).await.unwrap();
        store.release_usage(user, UsageKind::Ats).await.unwrap();
        store.release_usage(user, UsageKind::Ats).await.unwrap();
        assert_eq!(store.subscription(user).await.unwrap().usage_ats, 0);
    }

    #[tokio::test]
    async fn test_insert_resume_enforces_plan_allowance() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        store.insert_resume(&ResumeRow::new(user, None, None)).await.unwrap();
        let err = store
            .insert_resume(&ResumeRow::new(user, None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PlanLimit(_)));

        store.set_plan(user, Plan::Pro).await;
        store.insert_resume(&ResumeRow::new(user, None, None)).await.unwrap();
        assert_eq!(store.list_resumes(user).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_history_is_newest_first_per_user() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let first = AiHistoryRow::new(user, "summary", "a", "b");
        let second = AiHistoryRow::new(user, "experience", "c", "d");
        store.append_ai_history(&first).await.unwrap();
        store
            .append_ai_history(&AiHistoryRow::new(Uuid::new_v4(), "summary", "x", "y"))
            .await
            .unwrap();
        store.append_ai_history(&second).await.unwrap();

        let rows = store.ai_history(user).await.unwrap();
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
