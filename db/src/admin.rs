use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::admin::SessionCreateRequest,
    models::admin::{AdminProfile, AdminSession},
};

pub async fn get_profile_by_username<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    username: &str,
) -> Res<Option<AdminProfile>> {
    sqlx::query_as::<_, AdminProfile>("SELECT * FROM profiles WHERE username = $1")
        .bind(username)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Creates the profile, or replaces its password hash if it already exists.
pub async fn upsert_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    username: &str,
    password_hash: &str,
) -> Res<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (username, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (username) DO UPDATE SET password_hash = EXCLUDED.password_hash
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_session<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: SessionCreateRequest,
) -> Res<AdminSession> {
    sqlx::query_as::<_, AdminSession>(
        r#"
        INSERT INTO admin_sessions (username, expires_at)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(data.username)
    .bind(data.expires_at)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_active_session<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    session_id: Uuid,
    now: DateTime<Utc>,
) -> Res<Option<AdminSession>> {
    sqlx::query_as::<_, AdminSession>(
        "SELECT * FROM admin_sessions WHERE id = $1 AND expires_at > $2",
    )
    .bind(session_id)
    .bind(now)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_session<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    session_id: Uuid,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
        .bind(session_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_expired_sessions<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    now: DateTime<Utc>,
) -> Res<u64> {
    let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= $1")
        .bind(now)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
