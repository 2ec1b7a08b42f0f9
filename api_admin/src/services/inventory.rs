use std::collections::BTreeMap;

use api_plans::PlanCatalog;
use db::models::voucher::Voucher;
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoucherStats {
    pub total: usize,
    pub used: usize,
    pub available: usize,
}

impl VoucherStats {
    fn count<'a>(vouchers: impl IntoIterator<Item = &'a Voucher>) -> Self {
        let (total, used) = vouchers
            .into_iter()
            .fold((0, 0), |(total, used), v| (total + 1, used + v.is_used as usize));
        VoucherStats {
            total,
            used,
            available: total - used,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Inventory {
    /// Every voucher, keyed by the plan id stored on it.
    pub vouchers: BTreeMap<String, Vec<Voucher>>,
    pub stats: VoucherStats,
    /// One entry per catalog plan, including plans without vouchers.
    pub by_plan: BTreeMap<String, VoucherStats>,
}

pub fn summarize(vouchers: Vec<Voucher>, catalog: &PlanCatalog) -> Inventory {
    let stats = VoucherStats::count(&vouchers);

    let mut grouped: BTreeMap<String, Vec<Voucher>> = BTreeMap::new();
    for voucher in vouchers {
        grouped
            .entry(voucher.plan_id.clone())
            .or_default()
            .push(voucher);
    }

    let by_plan = catalog
        .plans()
        .iter()
        .map(|plan| {
            let plan_stats = grouped
                .get(&plan.id)
                .map(|vouchers| VoucherStats::count(vouchers))
                .unwrap_or_default();
            (plan.id.clone(), plan_stats)
        })
        .collect();

    Inventory {
        vouchers: grouped,
        stats,
        by_plan,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn voucher(plan_id: &str, is_used: bool) -> Voucher {
        Voucher {
            id: Uuid::new_v4(),
            code: Uuid::new_v4().to_string(),
            plan_id: plan_id.to_string(),
            is_used,
            used_at: is_used.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counts_overall_and_per_plan() {
        let inventory = summarize(
            vec![
                voucher("daily", true),
                voucher("daily", false),
                voucher("daily", false),
                voucher("weekly", true),
                voucher("legacy", false),
            ],
            &PlanCatalog::standard(),
        );

        assert_eq!(
            inventory.stats,
            VoucherStats {
                total: 5,
                used: 2,
                available: 3
            }
        );
        assert_eq!(
            inventory.by_plan["daily"],
            VoucherStats {
                total: 3,
                used: 1,
                available: 2
            }
        );
        assert_eq!(inventory.by_plan["monthly"], VoucherStats::default());
        assert!(!inventory.by_plan.contains_key("legacy"));
        assert_eq!(inventory.vouchers["legacy"].len(), 1);
    }

    #[test]
    fn empty_inventory_still_lists_every_plan() {
        let inventory = summarize(vec![], &PlanCatalog::standard());
        assert_eq!(inventory.by_plan.len(), 3);
        assert!(inventory.vouchers.is_empty());
    }
}
