use common::error::{AppError, Res};
use db::models::voucher::Voucher;
use serde::Serialize;
use uuid::Uuid;

use super::flow::VoucherFlow;

/// A voucher a customer may buy. The code stays hidden until purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableVoucher {
    pub id: Uuid,
    pub plan_id: String,
    pub label: String,
}

impl VoucherFlow {
    /// Lists the unused vouchers of a catalog plan, oldest first.
    pub async fn vouchers_for_plan(&self, plan_id: &str) -> Res<Vec<AvailableVoucher>> {
        if self.catalog.find(plan_id).is_none() {
            return Err(AppError::NotFound(format!("Plan {} does not exist", plan_id)));
        }

        let vouchers = match self.cache.get(plan_id) {
            Some(vouchers) => vouchers,
            None => {
                let vouchers = self.store.unused_vouchers(plan_id).await?;
                self.cache.put(plan_id, vouchers.clone());
                vouchers
            }
        };

        Ok(label(vouchers))
    }
}

fn label(vouchers: Vec<Voucher>) -> Vec<AvailableVoucher> {
    vouchers
        .into_iter()
        .enumerate()
        .map(|(i, voucher)| AvailableVoucher {
            id: voucher.id,
            plan_id: voucher.plan_id,
            label: format!("Voucher #{}", i + 1),
        })
        .collect()
}
