use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plans::{Plan, UsageKind};

pub const STATUS_ACTIVE: &str = "active";

/// A user's plan and metered usage. Users with no stored row are on `free`
/// with zero usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: Uuid,
    pub plan: Plan,
    pub status: String,
    pub usage_ai: u32,
    pub usage_ats: u32,
}

impl Subscription {
    pub fn free(user_id: Uuid) -> Self {
        Self {
            user_id,
            plan: Plan::Free,
            status: STATUS_ACTIVE.to_string(),
            usage_ai: 0,
            usage_ats: 0,
        }
    }

    pub fn usage(&self, kind: UsageKind) -> u32 {
        match kind {
            UsageKind::Ai => self.usage_ai,
            UsageKind::Ats => self.usage_ats,
        }
    }

    pub fn record(&mut self, kind: UsageKind) {
        match kind {
            UsageKind::Ai => self.usage_ai = self.usage_ai.saturating_add(1),
            UsageKind::Ats => self.usage_ats = self.usage_ats.saturating_add(1),
        }
    }

    /// Returns a unit reserved by `record` for an operation that then failed.
    pub fn release(&mut self, kind: UsageKind) {
        match kind {
            UsageKind::Ai => self.usage_ai = self.usage_ai.saturating_sub(1),
            UsageKind::Ats => self.usage_ats = self.usage_ats.saturating_sub(1),
        }
    }
}
