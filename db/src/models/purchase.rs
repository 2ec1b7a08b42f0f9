use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Purchase {
    pub id: Uuid,
    pub voucher_id: Uuid,
    pub phone_number: String,
    pub purchased_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
