use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::{
    dtos::purchase::PurchaseCreateRequest,
    models::{purchase::Purchase, voucher::ActivePurchaseRow},
};

pub async fn insert_purchase<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PurchaseCreateRequest,
) -> Res<Purchase> {
    sqlx::query_as::<_, Purchase>(
        r#"
        INSERT INTO purchased_vouchers (voucher_id, phone_number, purchased_at, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.voucher_id)
    .bind(data.phone_number)
    .bind(data.purchased_at)
    .bind(data.expires_at)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Purchases for a phone number that have not expired yet, newest expiry first.
pub async fn get_active_purchases_by_phone<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    phone_number: &str,
    now: DateTime<Utc>,
) -> Res<Vec<ActivePurchaseRow>> {
    sqlx::query_as::<_, ActivePurchaseRow>(
        r#"
        SELECT pv.voucher_id, pv.expires_at, v.code, v.plan_id
        FROM purchased_vouchers pv
        LEFT JOIN vouchers v ON v.id = pv.voucher_id
        WHERE pv.phone_number = $1 AND pv.expires_at > $2
        ORDER BY pv.expires_at DESC
        "#,
    )
    .bind(phone_number)
    .bind(now)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
