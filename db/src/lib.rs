use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use std::{str::FromStr, sync::Arc};

pub mod admin;
pub mod purchase;
pub mod voucher;

pub mod models {
    pub mod admin;
    pub mod purchase;
    pub mod voucher;
}

pub mod dtos {
    pub mod admin;
    pub mod purchase;
    pub mod voucher;
}

const MAX_CONNECTIONS: u32 = 10;

fn connect_options(url: &str, require_ssl: bool) -> Result<PgConnectOptions, sqlx::Error> {
    let options = PgConnectOptions::from_str(url)?;
    Ok(if require_ssl {
        options.ssl_mode(PgSslMode::Require)
    } else {
        options
    })
}

/// Connects to Postgres, creating the database if it does not exist yet,
/// and applies pending migrations.
pub async fn setup(
    database_url: &str,
    require_ssl: bool,
) -> Result<Arc<PgPool>, Box<dyn std::error::Error>> {
    let url = url::Url::parse(database_url)?;
    let db_name = url.path().trim_start_matches('/').to_string();

    // the maintenance database always exists, so connect there to check
    let mut admin_url = url.clone();
    admin_url.set_path("/postgres");
    let admin_pool =
        PgPool::connect_with(connect_options(admin_url.as_str(), require_ssl)?).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&admin_pool)
            .await?;

    if !exists {
        log::info!("Creating database {}", db_name);
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name.replace('"', "\"\"")))
            .execute(&admin_pool)
            .await?;
    }

    admin_pool.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(connect_options(database_url, require_ssl)?)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database {} is up to date", db_name);

    Ok(Arc::new(pool))
}
