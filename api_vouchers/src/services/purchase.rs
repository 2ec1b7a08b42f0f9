use chrono::{DateTime, Utc};
use common::{
    error::AppError,
    http::mask_phone,
    outcome::Outcome,
};
use db::{dtos::purchase::PurchaseCreateRequest, models::voucher::Voucher};
use notifier::messages::voucher_message;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::flow::VoucherFlow;

/// Why a purchase did not go through.
///
/// Customers see the same message for every business failure; the
/// distinction is kept for logs and tests.
#[derive(Error, Debug)]
pub enum PurchaseError {
    #[error("voucher {0} is not available")]
    Unavailable(Uuid),

    #[error("plan {0} does not exist")]
    PlanNotFound(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<PurchaseError> for AppError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::Unavailable(_) | PurchaseError::PlanNotFound(_) => AppError::Conflict(
                "This voucher is no longer available. Please try another voucher.".to_string(),
            ),
            PurchaseError::Store(e) => e,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchasedVoucher {
    pub voucher: Voucher,
    pub plan_name: String,
    pub purchased_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VoucherFlow {
    /// Sells `voucher_id` to `phone_number`.
    ///
    /// The voucher is marked used and the purchase recorded in one
    /// transaction, so two buyers racing for the same voucher cannot both
    /// succeed. The code is then texted to the buyer, best-effort.
    pub async fn purchase(
        &self,
        voucher_id: Uuid,
        phone_number: &str,
        now: DateTime<Utc>,
    ) -> Result<Outcome<PurchasedVoucher>, PurchaseError> {
        let voucher = match self.store.find_voucher(voucher_id).await? {
            Some(voucher) if !voucher.is_used => voucher,
            _ => return Err(PurchaseError::Unavailable(voucher_id)),
        };

        let plan = self
            .catalog
            .find(&voucher.plan_id)
            .ok_or_else(|| PurchaseError::PlanNotFound(voucher.plan_id.clone()))?;

        let expires_at = plan.duration.expires_at(now).ok_or_else(|| {
            AppError::Internal(format!("Expiry for plan {} is out of range", plan.id))
        })?;

        let claimed = self
            .store
            .claim_voucher(PurchaseCreateRequest {
                voucher_id,
                phone_number: phone_number.to_string(),
                purchased_at: now,
                expires_at,
            })
            .await?;

        let Some((voucher, record)) = claimed else {
            return Err(PurchaseError::Unavailable(voucher_id));
        };

        self.cache.invalidate(&voucher.plan_id);
        log::info!(
            "Sold voucher {} ({}) to {}",
            voucher.id,
            plan.id,
            mask_phone(phone_number)
        );

        let message = voucher_message(&self.brand_name, &plan.name, &voucher.code);
        let attempt = self.sms.send_sms(phone_number, &message).await;

        Ok(Outcome::from_attempt(
            PurchasedVoucher {
                voucher,
                plan_name: plan.name.clone(),
                purchased_at: record.purchased_at,
                expires_at: record.expires_at,
            },
            attempt,
            "Voucher SMS",
        ))
    }
}
