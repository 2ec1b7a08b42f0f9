use chrono::{DateTime, Utc};
use common::outcome::SideEffect;
use db::models::voucher::Voucher;
use serde::{Deserialize, Serialize};

use crate::services::{listing::AvailableVoucher, lookup::ActiveVoucher};

#[derive(Debug, Deserialize)]
pub struct PhoneNumberRequest {
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    pub plan_id: String,
}

#[derive(Debug, Serialize)]
pub struct ActiveVouchersResponse {
    pub active: bool,
    pub vouchers: Vec<ActiveVoucher>,
    pub notification: SideEffect,
}

#[derive(Debug, Serialize)]
pub struct AvailableVouchersResponse {
    pub plan_id: String,
    pub vouchers: Vec<AvailableVoucher>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub voucher: Voucher,
    pub plan_name: String,
    pub purchased_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub notification: SideEffect,
}
