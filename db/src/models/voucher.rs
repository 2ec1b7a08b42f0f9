use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Voucher {
    pub id: Uuid,
    pub code: String,
    pub plan_id: String,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A purchase joined to its voucher. The voucher side is optional because
/// the join is outer; rows without a code or plan are dropped by the caller.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ActivePurchaseRow {
    pub voucher_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub code: Option<String>,
    pub plan_id: Option<String>,
}
