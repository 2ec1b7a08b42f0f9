use chrono::{DateTime, Days, Months, Utc};
use serde::{Deserialize, Serialize};

/// How long a voucher stays active after purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "count", rename_all = "snake_case")]
pub enum DurationRule {
    Days(u64),
    /// Calendar months. A day that does not exist in the target month is
    /// clamped to that month's last day (Jan 31 + 1 month = Feb 28/29).
    Months(u32),
}

impl DurationRule {
    /// Returns `None` only when the result falls outside chrono's range.
    pub fn expires_at(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match *self {
            DurationRule::Days(days) => from.checked_add_days(Days::new(days)),
            DurationRule::Months(months) => from.checked_add_months(Months::new(months)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    /// Whole currency units; UGX has no minor unit.
    pub price: i64,
    pub currency: String,
    pub description: String,
    /// Hotspot user profile the vouchers of this plan were generated under.
    pub profile_name: String,
    pub duration: DurationRule,
}

impl Plan {
    /// Price as shown to customers, e.g. `UGX 20,000`.
    pub fn display_price(&self) -> String {
        format!("{} {}", self.currency, group_thousands(self.price))
    }
}

fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// The fixed set of plans offered by this deployment.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    /// Day, week and month plans.
    pub fn standard() -> Self {
        let plan = |id: &str, name: &str, price: i64, description: &str, profile: &str, duration| {
            Plan {
                id: id.to_string(),
                name: name.to_string(),
                price,
                currency: "UGX".to_string(),
                description: description.to_string(),
                profile_name: profile.to_string(),
                duration,
            }
        };

        Self::new(vec![
            plan(
                "daily",
                "Luco-Day Plan",
                1_000,
                "24 hours of unlimited internet access.",
                "Luco-Day",
                DurationRule::Days(1),
            ),
            plan(
                "weekly",
                "Luco-Week Plan",
                5_000,
                "7 days of unlimited internet access.",
                "Luco-Week",
                DurationRule::Days(7),
            ),
            plan(
                "monthly",
                "Luco-Month Plan",
                20_000,
                "30 days of unlimited internet access.",
                "Luco-Month",
                DurationRule::Months(1),
            ),
        ])
    }

    pub fn find(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }
}
