use actix_session::{
    SessionMiddleware,
    config::PersistentSession,
    storage::CookieSessionStore,
};
use actix_web::{
    cookie::{Key, SameSite, time::Duration},
    web,
};
use middleware::auth::AdminAuthMiddleware;

pub mod state;
pub mod store;

pub mod middleware {
    pub mod auth;
}
pub mod routes {
    pub mod auth;
    pub mod voucher;
}
pub mod services {
    pub mod auth;
    pub mod import;
    pub mod inventory;
}
mod dtos {
    pub(crate) mod admin;
}

pub use state::AdminState;
pub use store::{AdminStore, PgAdminStore};

/// Largest CSV accepted by the import route.
const MAX_IMPORT_BYTES: usize = 4 * 1024 * 1024;

/// Signed cookie session carrying the admin token.
///
/// `secret` must be at least 32 bytes.
pub fn session_middleware(
    cookie_secure: bool,
    is_production: bool,
    secret: &[u8],
    ttl_hours: i64,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::derive_from(secret))
        .cookie_name("hotspot_admin".to_string())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(if is_production {
            SameSite::Strict
        } else {
            SameSite::Lax
        })
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(ttl_hours)))
        .build()
}

pub fn admin_middleware() -> AdminAuthMiddleware {
    AdminAuthMiddleware::new()
}

pub fn mount_admin() -> actix_web::Scope {
    web::scope("/admin")
        .app_data(web::PayloadConfig::new(MAX_IMPORT_BYTES))
        .service(routes::auth::post_login)
        .service(
            web::scope("")
                .wrap(admin_middleware())
                .service(routes::auth::post_logout)
                .service(routes::auth::get_session)
                .service(routes::voucher::get_vouchers)
                .service(routes::voucher::post_import),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use chrono::Duration as ChronoDuration;
    use common::jwt::{self, ClaimsSpec};
    use db::models::{admin::AdminSession, voucher::Voucher};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::{
        services::auth::hash_password,
        state::testing::{jwt_config, now, state},
        store::MockAdminStore,
    };

    macro_rules! app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Arc::new(state($store))))
                    .wrap(session_middleware(false, false, jwt_config().secret.as_bytes(), 12))
                    .service(mount_admin()),
            )
            .await
        };
    }

    fn token_for(session_id: Uuid) -> String {
        jwt::generate_jwt(
            ClaimsSpec {
                session_id,
                username: "admin".to_string(),
            },
            &jwt_config(),
        )
        .unwrap()
    }

    fn live_session(store: &mut MockAdminStore, session_id: Uuid) {
        store
            .expect_active_session()
            .withf(move |id, _| *id == session_id)
            .returning(|id, _| {
                Ok(Some(AdminSession {
                    id,
                    username: "admin".to_string(),
                    created_at: now(),
                    expires_at: now() + ChronoDuration::days(365 * 50),
                }))
            });
    }

    #[actix_web::test]
    async fn admin_routes_need_a_token() {
        let app = app!(MockAdminStore::new());

        for uri in ["/admin/vouchers", "/admin/auth/session"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[actix_web::test]
    async fn forged_token_is_rejected() {
        let mut store = MockAdminStore::new();
        store.expect_active_session().never();
        let app = app!(store);

        let req = test::TestRequest::get()
            .uri("/admin/vouchers")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn revoked_session_is_rejected() {
        let mut store = MockAdminStore::new();
        store.expect_active_session().returning(|_, _| Ok(None));
        let app = app!(store);

        let req = test::TestRequest::get()
            .uri("/admin/auth/session")
            .insert_header(("Authorization", format!("Bearer {}", token_for(Uuid::new_v4()))))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn login_sets_a_cookie_that_unlocks_admin_routes() {
        let session_id = Uuid::new_v4();
        let password_hash = hash_password("hunter22").unwrap();

        let mut store = MockAdminStore::new();
        store.expect_purge_expired_sessions().returning(|_| Ok(0));
        store.expect_find_profile().returning(move |username| {
            Ok(Some(db::models::admin::AdminProfile {
                id: Uuid::new_v4(),
                username: username.to_string(),
                password_hash: password_hash.clone(),
                created_at: now(),
            }))
        });
        store.expect_create_session().returning(move |req| {
            Ok(AdminSession {
                id: session_id,
                username: req.username,
                created_at: now(),
                expires_at: req.expires_at,
            })
        });
        live_session(&mut store, session_id);
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/admin/auth/login")
            .set_json(json!({ "username": "admin", "password": "hunter22" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == "hotspot_admin")
            .unwrap()
            .into_owned();

        let req = test::TestRequest::get()
            .uri("/admin/auth/session")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "admin");
        assert_eq!(body["session_id"], session_id.to_string());
    }

    #[actix_web::test]
    async fn bad_credentials_are_401() {
        let mut store = MockAdminStore::new();
        store.expect_purge_expired_sessions().returning(|_| Ok(0));
        store.expect_find_profile().returning(|_| Ok(None));
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/admin/auth/login")
            .set_json(json!({ "username": "admin", "password": "wrong" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logout_ends_the_session() {
        let session_id = Uuid::new_v4();
        let mut store = MockAdminStore::new();
        live_session(&mut store, session_id);
        store
            .expect_end_session()
            .withf(move |id| *id == session_id)
            .times(1)
            .returning(|_| Ok(true));
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/admin/auth/logout")
            .insert_header(("Authorization", format!("Bearer {}", token_for(session_id))))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn inventory_reports_counts() {
        let session_id = Uuid::new_v4();
        let mut store = MockAdminStore::new();
        live_session(&mut store, session_id);
        store.expect_all_vouchers().returning(|| {
            Ok(vec![Voucher {
                id: Uuid::new_v4(),
                code: "abc".to_string(),
                plan_id: "daily".to_string(),
                is_used: false,
                used_at: None,
                created_at: now(),
            }])
        });
        let app = app!(store);

        let req = test::TestRequest::get()
            .uri("/admin/vouchers")
            .insert_header(("Authorization", format!("Bearer {}", token_for(session_id))))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["stats"]["total"], 1);
        assert_eq!(body["by_plan"]["daily"]["available"], 1);
        assert_eq!(body["by_plan"]["weekly"]["total"], 0);
        assert_eq!(body["vouchers"]["daily"][0]["code"], "abc");
    }

    #[actix_web::test]
    async fn import_accepts_a_csv_body() {
        let session_id = Uuid::new_v4();
        let mut store = MockAdminStore::new();
        live_session(&mut store, session_id);
        store
            .expect_import_vouchers()
            .withf(|req| req.plan_id == "weekly" && req.codes.len() == 2)
            .returning(|req| Ok(req.codes.len() as u64));
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/admin/vouchers/import?plan_id=weekly")
            .insert_header(("Authorization", format!("Bearer {}", token_for(session_id))))
            .insert_header(("Content-Type", "text/csv"))
            .set_payload("Username,Password\nuser1,pass1\nuser2,pass2\n")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["inserted"], 2);
        assert_eq!(body["plan_name"], "Luco-Week Plan");
    }

    #[actix_web::test]
    async fn import_without_username_column_is_400() {
        let session_id = Uuid::new_v4();
        let mut store = MockAdminStore::new();
        live_session(&mut store, session_id);
        store.expect_import_vouchers().never();
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/admin/vouchers/import?plan_id=daily")
            .insert_header(("Authorization", format!("Bearer {}", token_for(session_id))))
            .set_payload("Code,Password\nabc,def\n")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
