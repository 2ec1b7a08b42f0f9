use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseCreateRequest {
    pub voucher_id: Uuid,
    pub phone_number: String,
    pub purchased_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
