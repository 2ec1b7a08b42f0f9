use chrono::{DateTime, Utc};
use common::{error::Res, http::mask_phone, outcome::Outcome};
use notifier::messages::active_vouchers_message;
use serde::Serialize;
use uuid::Uuid;

use super::flow::VoucherFlow;

/// An unexpired voucher owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveVoucher {
    pub voucher_id: Uuid,
    pub code: String,
    pub plan_id: String,
    pub plan_name: String,
    pub expires_at: DateTime<Utc>,
}

impl VoucherFlow {
    /// Finds the vouchers `phone_number` bought that are still running at `now`.
    ///
    /// Returns `None` when there are none, in which case no SMS is sent.
    /// Otherwise the codes are texted to the customer, best-effort.
    pub async fn active_vouchers(
        &self,
        phone_number: &str,
        now: DateTime<Utc>,
    ) -> Res<Option<Outcome<Vec<ActiveVoucher>>>> {
        let rows = self.store.active_purchases(phone_number, now).await?;

        let active: Vec<ActiveVoucher> = rows
            .into_iter()
            .filter_map(|row| {
                let (Some(code), Some(plan_id)) = (row.code, row.plan_id) else {
                    log::warn!("Purchase of voucher {} has no voucher row", row.voucher_id);
                    return None;
                };
                let Some(plan) = self.catalog.find(&plan_id) else {
                    log::warn!(
                        "Voucher {} references unknown plan {}",
                        row.voucher_id,
                        plan_id
                    );
                    return None;
                };
                Some(ActiveVoucher {
                    voucher_id: row.voucher_id,
                    code,
                    plan_id,
                    plan_name: plan.name.clone(),
                    expires_at: row.expires_at,
                })
            })
            .collect();

        if active.is_empty() {
            log::info!("No active vouchers for {}", mask_phone(phone_number));
            return Ok(None);
        }

        let message = active_vouchers_message(
            &self.brand_name,
            active.iter().map(|voucher| voucher.code.as_str()),
        );
        let attempt = self.sms.send_sms(phone_number, &message).await;

        Ok(Some(Outcome::from_attempt(
            active,
            attempt,
            "Active vouchers SMS",
        )))
    }
}
