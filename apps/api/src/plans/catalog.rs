use serde::Serialize;

use crate::plans::{Plan, PlanLimits};

/// Public description of a plan, as shown on the pricing page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub id: Plan,
    pub name: &'static str,
    pub price: f64,
    pub billing: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub popular: bool,
    pub limits: PlanLimits,
    pub features: Vec<&'static str>,
}

pub fn plan_catalog() -> Vec<PlanInfo> {
    vec![
        PlanInfo {
            id: Plan::Free,
            name: "Free",
            price: 0.0,
            billing: "Forever Free",
            popular: false,
            limits: Plan::Free.limits(),
            features: vec![
                "1 Resume",
                "Basic Templates",
                "AI Suggestions (5/month)",
                "ATS Testing (5/month)",
                "Email Support",
            ],
        },
        PlanInfo {
            id: Plan::Pro,
            name: "Pro",
            price: 9.99,
            billing: "per month",
            popular: true,
            limits: Plan::Pro.limits(),
            features: vec![
                "5 Resumes",
                "All Templates",
                "AI Suggestions (50/month)",
                "ATS Testing (50/month)",
                "PDF Export",
                "Email Support",
            ],
        },
        PlanInfo {
            id: Plan::Premium,
            name: "Premium",
            price: 19.99,
            billing: "per month",
            popular: false,
            limits: Plan::Premium.limits(),
            features: vec![
                "Unlimited Resumes",
                "All Templates",
                "Unlimited AI Suggestions",
                "Unlimited ATS Testing",
                "PDF & Word Export",
                "Priority 24/7 Support",
                "LinkedIn Optimization",
                "Interview Prep",
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_each_plan_once_in_price_order() {
        let plans = plan_catalog();
        let ids: Vec<Plan> = plans.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Plan::Free, Plan::Pro, Plan::Premium]);
        assert!(plans.windows(2).all(|w| w[0].price < w[1].price));
    }

    #[test]
    fn test_only_pro_is_marked_popular() {
        let json = serde_json::to_value(plan_catalog()).unwrap();
        assert_eq!(json[1]["popular"], true);
        assert!(json[0].get("popular").is_none());
        assert_eq!(json[2]["limits"]["aiRewrites"], serde_json::Value::Null);
    }
}
