use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct SessionCreateRequest {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}
