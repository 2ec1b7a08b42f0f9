use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::Res;
use db::{
    dtos::{admin::SessionCreateRequest, voucher::VoucherImportRequest},
    models::{
        admin::{AdminProfile, AdminSession},
        voucher::Voucher,
    },
};
use sqlx::PgPool;
use uuid::Uuid;

/// Persistence used by the admin panel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_profile(&self, username: &str) -> Res<Option<AdminProfile>>;

    async fn save_profile(&self, username: &str, password_hash: &str) -> Res<()>;

    async fn create_session(&self, session: SessionCreateRequest) -> Res<AdminSession>;

    async fn active_session(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Res<Option<AdminSession>>;

    async fn end_session(&self, session_id: Uuid) -> Res<bool>;

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Res<u64>;

    async fn all_vouchers(&self) -> Res<Vec<Voucher>>;

    /// Inserts every code or none of them.
    async fn import_vouchers(&self, import: VoucherImportRequest) -> Res<u64>;
}

pub struct PgAdminStore {
    pool: Arc<PgPool>,
}

impl PgAdminStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn find_profile(&self, username: &str) -> Res<Option<AdminProfile>> {
        db::admin::get_profile_by_username(&*self.pool, username).await
    }

    async fn save_profile(&self, username: &str, password_hash: &str) -> Res<()> {
        db::admin::upsert_profile(&*self.pool, username, password_hash).await
    }

    async fn create_session(&self, session: SessionCreateRequest) -> Res<AdminSession> {
        db::admin::insert_session(&*self.pool, session).await
    }

    async fn active_session(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Res<Option<AdminSession>> {
        db::admin::get_active_session(&*self.pool, session_id, now).await
    }

    async fn end_session(&self, session_id: Uuid) -> Res<bool> {
        db::admin::delete_session(&*self.pool, session_id).await
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Res<u64> {
        db::admin::delete_expired_sessions(&*self.pool, now).await
    }

    async fn all_vouchers(&self) -> Res<Vec<Voucher>> {
        db::voucher::get_all_vouchers(&*self.pool).await
    }

    async fn import_vouchers(&self, import: VoucherImportRequest) -> Res<u64> {
        let mut tx = self.pool.begin().await?;
        let inserted = db::voucher::insert_vouchers(&mut *tx, import).await?;
        tx.commit().await?;
        Ok(inserted)
    }
}
