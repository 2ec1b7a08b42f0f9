use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::Res;
use db::{
    dtos::purchase::PurchaseCreateRequest,
    models::{
        purchase::Purchase,
        voucher::{ActivePurchaseRow, Voucher},
    },
};
use sqlx::PgPool;
use uuid::Uuid;

/// Persistence used by the customer flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoucherStore: Send + Sync {
    async fn active_purchases(
        &self,
        phone_number: &str,
        now: DateTime<Utc>,
    ) -> Res<Vec<ActivePurchaseRow>>;

    async fn unused_vouchers(&self, plan_id: &str) -> Res<Vec<Voucher>>;

    async fn find_voucher(&self, voucher_id: Uuid) -> Res<Option<Voucher>>;

    /// Marks the voucher used and records the purchase atomically.
    /// Returns `None` when the voucher was already taken.
    async fn claim_voucher(
        &self,
        purchase: PurchaseCreateRequest,
    ) -> Res<Option<(Voucher, Purchase)>>;
}

pub struct PgVoucherStore {
    pool: Arc<PgPool>,
}

impl PgVoucherStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoucherStore for PgVoucherStore {
    async fn active_purchases(
        &self,
        phone_number: &str,
        now: DateTime<Utc>,
    ) -> Res<Vec<ActivePurchaseRow>> {
        db::purchase::get_active_purchases_by_phone(&*self.pool, phone_number, now).await
    }

    async fn unused_vouchers(&self, plan_id: &str) -> Res<Vec<Voucher>> {
        db::voucher::get_unused_vouchers_by_plan(&*self.pool, plan_id).await
    }

    async fn find_voucher(&self, voucher_id: Uuid) -> Res<Option<Voucher>> {
        db::voucher::get_voucher_by_id(&*self.pool, voucher_id).await
    }

    async fn claim_voucher(
        &self,
        purchase: PurchaseCreateRequest,
    ) -> Res<Option<(Voucher, Purchase)>> {
        let mut tx = self.pool.begin().await?;

        let Some(voucher) =
            db::voucher::mark_voucher_used(&mut *tx, purchase.voucher_id, purchase.purchased_at)
                .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        // an error here drops `tx`, which rolls the mark back
        let record = db::purchase::insert_purchase(&mut *tx, purchase).await?;

        tx.commit().await?;
        Ok(Some((voucher, record)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use db::dtos::voucher::VoucherImportRequest;

    use super::*;

    async fn seed_voucher(pool: &PgPool) -> Uuid {
        let mut conn = pool.acquire().await.unwrap();
        db::voucher::insert_vouchers(
            &mut *conn,
            VoucherImportRequest {
                plan_id: "daily".to_string(),
                codes: vec!["abc123".to_string()],
            },
        )
        .await
        .unwrap();

        db::voucher::get_unused_vouchers_by_plan(pool, "daily")
            .await
            .unwrap()[0]
            .id
    }

    fn purchase(voucher_id: Uuid, phone_number: &str, valid_for: Duration) -> PurchaseCreateRequest {
        let purchased_at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        PurchaseCreateRequest {
            voucher_id,
            phone_number: phone_number.to_string(),
            purchased_at,
            expires_at: purchased_at + valid_for,
        }
    }

    async fn purchase_count(pool: &PgPool, voucher_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM purchased_vouchers WHERE voucher_id = $1")
            .bind(voucher_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "../db/migrations")]
    #[ignore = "requires DATABASE_URL and a local Postgres"]
    async fn second_claim_loses_and_leaves_one_purchase(pool: PgPool) {
        let voucher_id = seed_voucher(&pool).await;
        let store = PgVoucherStore::new(Arc::new(pool.clone()));

        let (voucher, record) = store
            .claim_voucher(purchase(voucher_id, "0712345678", Duration::days(1)))
            .await
            .unwrap()
            .unwrap();
        assert!(voucher.is_used);
        assert_eq!(record.voucher_id, voucher_id);

        let second = store
            .claim_voucher(purchase(voucher_id, "0787654321", Duration::days(1)))
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(purchase_count(&pool, voucher_id).await, 1);
    }

    #[sqlx::test(migrations = "../db/migrations")]
    #[ignore = "requires DATABASE_URL and a local Postgres"]
    async fn failed_purchase_insert_leaves_the_voucher_unused(pool: PgPool) {
        let voucher_id = seed_voucher(&pool).await;
        let store = PgVoucherStore::new(Arc::new(pool.clone()));

        // expiry equal to purchase time violates the table's CHECK constraint
        let result = store
            .claim_voucher(purchase(voucher_id, "0712345678", Duration::zero()))
            .await;
        assert!(result.is_err());

        let voucher = store.find_voucher(voucher_id).await.unwrap().unwrap();
        assert!(!voucher.is_used);
        assert!(voucher.used_at.is_none());
        assert_eq!(purchase_count(&pool, voucher_id).await, 0);
    }
}
