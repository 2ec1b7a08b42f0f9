use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use sqlx::{Executor, PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{dtos::voucher::VoucherImportRequest, models::voucher::Voucher};

/// Two bound parameters per row keeps each statement far below the
/// Postgres limit of 65535 parameters.
const IMPORT_CHUNK_SIZE: usize = 1000;

pub async fn get_voucher_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    voucher_id: Uuid,
) -> Res<Option<Voucher>> {
    sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE id = $1")
        .bind(voucher_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_unused_vouchers_by_plan<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    plan_id: &str,
) -> Res<Vec<Voucher>> {
    sqlx::query_as::<_, Voucher>(
        "SELECT * FROM vouchers WHERE plan_id = $1 AND is_used = FALSE ORDER BY created_at, id",
    )
    .bind(plan_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_all_vouchers<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<Voucher>> {
    sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers ORDER BY plan_id, created_at, id")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

/// Marks an unused voucher as used.
///
/// The `is_used = FALSE` guard makes this a compare-and-set: of two
/// concurrent callers only one gets the row back, the other gets `None`.
pub async fn mark_voucher_used<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    voucher_id: Uuid,
    used_at: DateTime<Utc>,
) -> Res<Option<Voucher>> {
    sqlx::query_as::<_, Voucher>(
        r#"
        UPDATE vouchers SET is_used = TRUE, used_at = $2
        WHERE id = $1 AND is_used = FALSE
        RETURNING *
        "#,
    )
    .bind(voucher_id)
    .bind(used_at)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

/// Inserts new unused vouchers for one plan.
///
/// Run it inside a transaction so a failing chunk leaves nothing behind.
pub async fn insert_vouchers(conn: &mut PgConnection, data: VoucherImportRequest) -> Res<u64> {
    let mut inserted = 0;
    for chunk in data.codes.chunks(IMPORT_CHUNK_SIZE) {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO vouchers (code, plan_id) ");
        qb.push_values(chunk, |mut row, code| {
            row.push_bind(code).push_bind(&data.plan_id);
        });
        let result = qb
            .build()
            .execute(&mut *conn)
            .await
            .map_err(AppError::from)?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}
