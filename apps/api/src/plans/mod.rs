//! Subscription plans and per-plan usage quotas.
//!
//! A metered operation reserves one unit of quota before it runs, in the same
//! store step that checks the limit, and gives it back if it fails.

pub mod catalog;
pub mod handlers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::subscription::Subscription;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Premium,
}

impl Plan {
    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Premium => "premium",
        }
    }

    /// Quotas for this plan. `None` means unlimited.
    pub fn limits(self) -> PlanLimits {
        match self {
            Plan::Free => PlanLimits {
                ai_rewrites: Some(5),
                ats_tests: Some(5),
                resumes: Some(1),
            },
            Plan::Pro => PlanLimits {
                ai_rewrites: Some(50),
                ats_tests: Some(50),
                resumes: Some(5),
            },
            Plan::Premium => PlanLimits {
                ai_rewrites: None,
                ats_tests: None,
                resumes: None,
            },
        }
    }

    fn upgrade_hint(self) -> &'static str {
        match self {
            Plan::Free => "Upgrade to Pro or Premium for more.",
            Plan::Pro => "Upgrade to Premium for unlimited use.",
            Plan::Premium => "",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "premium" => Ok(Plan::Premium),
            other => Err(format!("unknown plan '{other}'")),
        }
    }
}

/// Metered operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageKind {
    Ai,
    Ats,
}

impl UsageKind {
    fn label(self) -> &'static str {
        match self {
            UsageKind::Ai => "AI suggestions",
            UsageKind::Ats => "ATS testing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub ai_rewrites: Option<u32>,
    pub ats_tests: Option<u32>,
    pub resumes: Option<u32>,
}

impl PlanLimits {
    pub fn for_usage(&self, kind: UsageKind) -> Option<u32> {
        match kind {
            UsageKind::Ai => self.ai_rewrites,
            UsageKind::Ats => self.ats_tests,
        }
    }
}

/// Rejects a metered operation once the subscription has used its quota.
pub fn enforce_quota(subscription: &Subscription, kind: UsageKind) -> Result<(), AppError> {
    let plan = subscription.plan;
    match plan.limits().for_usage(kind) {
        Some(limit) if subscription.usage(kind) >= limit => Err(AppError::PlanLimit(format!(
            "{} plan limit of {limit} {} reached. {}",
            capitalize(plan.as_str()),
            kind.label(),
            plan.upgrade_hint()
        ))),
        _ => Ok(()),
    }
}

/// Rejects resume creation once the plan's resume allowance is used.
pub fn enforce_resume_quota(plan: Plan, existing: usize) -> Result<(), AppError> {
    match plan.limits().resumes {
        Some(limit) if existing >= limit as usize => Err(AppError::PlanLimit(format!(
            "{} plan allows {limit} resume(s). {}",
            capitalize(plan.as_str()),
            plan.upgrade_hint()
        ))),
        _ => Ok(()),
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}
