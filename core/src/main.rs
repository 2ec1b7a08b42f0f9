mod cors;

use std::{sync::Arc, time::Duration};

use actix_web::{
    App, HttpServer,
    web::{self},
};
use api_admin::{AdminState, PgAdminStore};
use api_plans::PlanCatalog;
use api_vouchers::{AvailabilityCache, PgVoucherStore, VoucherFlow};
use common::env_config::Config;
use notifier::SmsGateway;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();
    let cookie_secure = !origin.contains("localhost");

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // shared services
    let catalog = Arc::new(PlanCatalog::standard());
    let cache = Arc::new(AvailabilityCache::new(Duration::from_secs(
        config.voucher_cache_ttl_seconds,
    )));
    let sms = Arc::new(SmsGateway::new(&config.sms).expect("Failed to create SMS client"));

    let flow = Arc::new(VoucherFlow::new(
        Arc::new(PgVoucherStore::new(pool.clone())),
        sms,
        catalog.clone(),
        cache.clone(),
        config.sms.brand_name.clone(),
    ));
    let admin = Arc::new(AdminState {
        store: Arc::new(PgAdminStore::new(pool.clone())),
        catalog: catalog.clone(),
        cache,
        jwt_config: config.jwt_config.clone(),
    });

    // create or refresh the admin profile
    if let Some(bootstrap) = &config.admin_bootstrap {
        api_admin::services::auth::ensure_admin(
            admin.store.as_ref(),
            &bootstrap.username,
            &bootstrap.password,
        )
        .await
        .expect("Failed to create admin profile");
    }

    // one quota for all workers
    let limiter = limiter::global_middleware(config.rate_limit_per_second);

    log::info!(
        "Listening on {}:{} with {} workers",
        config.server_host,
        config.server_port,
        config.num_workers
    );

    HttpServer::new(move || {
        let secret = config_data.jwt_config.secret.as_bytes();
        App::new()
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(flow.clone()))
            .app_data(web::Data::new(admin.clone()))
            .wrap(limiter.clone()) // 4th
            .wrap(logger::middleware(config_data.console_logging_enabled)) // 3rd
            .wrap(cors::middleware(&origin)) // 2nd
            .wrap(api_admin::session_middleware(
                cookie_secure,
                is_production,
                secret,
                config_data.jwt_config.expiration_hours,
            )) // 1st
            .service(
                web::scope("/api")
                    .service(api_plans::mount_plans())
                    .service(api_vouchers::mount_vouchers())
                    .service(api_admin::mount_admin()),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
