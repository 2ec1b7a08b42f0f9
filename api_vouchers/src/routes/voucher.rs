use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use chrono::Utc;
use common::{
    error::{AppError, Res},
    http::{Success, mask_phone, require_phone_number},
    outcome::SideEffect,
};
use uuid::Uuid;

use crate::{
    dtos::voucher::{
        ActiveVouchersResponse, AvailableVouchersResponse, PhoneNumberRequest, PlanQuery,
        PurchaseResponse,
    },
    services::{flow::VoucherFlow, purchase::PurchaseError},
};

/// Checks whether a phone number still holds unexpired vouchers.
///
/// # Input
/// - `req`: JSON payload with the customer's `phone_number`
///
/// # Output
/// - Success: `{ "active": true, "vouchers": [...], "notification": "completed" }`
///   when vouchers are running, the codes having been texted again;
///   `{ "active": false, "vouchers": [], "notification": "skipped" }` otherwise
/// - Error: 400 Bad Request for a blank phone number
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/vouchers/active', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ phone_number: '0712345678' })
/// });
///
/// const { active, vouchers } = await response.json();
/// if (!active) {
///   // continue to plan selection
/// }
/// ```
#[post("/active")]
pub async fn post_active(
    req: web::Json<PhoneNumberRequest>,
    flow: web::Data<Arc<VoucherFlow>>,
) -> Res<impl Responder> {
    let phone_number = require_phone_number(&req.phone_number)?;

    let response = match flow.active_vouchers(&phone_number, Utc::now()).await? {
        Some(outcome) => ActiveVouchersResponse {
            active: true,
            vouchers: outcome.value,
            notification: outcome.notification,
        },
        None => ActiveVouchersResponse {
            active: false,
            vouchers: vec![],
            notification: SideEffect::Skipped,
        },
    };
    Success::ok(response)
}

/// Lists the vouchers still for sale under a plan.
///
/// Codes are not part of the listing; a customer only learns a code by
/// buying it.
///
/// # Input
/// - `query`: `?plan_id=daily`
///
/// # Output
/// - Success: `{ "plan_id": "daily", "vouchers": [{ "id", "plan_id", "label" }] }`
/// - Error: 404 Not Found for a plan outside the catalog
#[get("")]
pub async fn get_vouchers(
    query: web::Query<PlanQuery>,
    flow: web::Data<Arc<VoucherFlow>>,
) -> Res<impl Responder> {
    let query = query.into_inner();
    let vouchers = flow.vouchers_for_plan(&query.plan_id).await?;
    Success::ok(AvailableVouchersResponse {
        plan_id: query.plan_id,
        vouchers,
    })
}

/// Buys one voucher and texts its code to the buyer.
///
/// # Input
/// - `path`: voucher id
/// - `req`: JSON payload with the buyer's `phone_number`
///
/// # Output
/// - Success: the used voucher with its code, plan name and validity window.
///   `notification` is `"failed"` when the SMS could not be sent; the sale
///   stands regardless
/// - Error: 409 Conflict when the voucher was already sold or cannot be
///   sold, 400 Bad Request for a blank phone number
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch(`/api/vouchers/${voucherId}/purchase`, {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ phone_number: '0712345678' })
/// });
///
/// if (response.status === 409) {
///   // ask the customer to pick another voucher
/// }
/// ```
#[post("/{voucher_id}/purchase")]
pub async fn post_purchase(
    path: web::Path<Uuid>,
    req: web::Json<PhoneNumberRequest>,
    flow: web::Data<Arc<VoucherFlow>>,
) -> Res<impl Responder> {
    let voucher_id = path.into_inner();
    let phone_number = require_phone_number(&req.phone_number)?;

    let outcome = match flow.purchase(voucher_id, &phone_number, Utc::now()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if !matches!(e, PurchaseError::Store(_)) {
                log::warn!(
                    "Purchase of voucher {} by {} refused: {}",
                    voucher_id,
                    mask_phone(&phone_number),
                    e
                );
            }
            return Err(AppError::from(e));
        }
    };

    let purchased = outcome.value;
    Success::ok(PurchaseResponse {
        voucher: purchased.voucher,
        plan_name: purchased.plan_name,
        purchased_at: purchased.purchased_at,
        expires_at: purchased.expires_at,
        notification: outcome.notification,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use common::error::AppError;
    use db::models::purchase::Purchase;
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        services::flow::testing::{MockSms, flow, voucher},
        store::MockVoucherStore,
    };

    macro_rules! app {
        ($flow:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Arc::new($flow)))
                    .service(crate::mount_vouchers()),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn listing_hides_codes() {
        let mut store = MockVoucherStore::new();
        store
            .expect_unused_vouchers()
            .returning(|_| Ok(vec![voucher("secret-code", "daily")]));
        let app = app!(flow(store, MockSms::new()));

        let req = test::TestRequest::get()
            .uri("/vouchers?plan_id=daily")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["plan_id"], "daily");
        assert_eq!(body["vouchers"][0]["label"], "Voucher #1");
        assert!(!body.to_string().contains("secret-code"));
    }

    #[actix_web::test]
    async fn listing_an_unknown_plan_is_404() {
        let app = app!(flow(MockVoucherStore::new(), MockSms::new()));

        let req = test::TestRequest::get()
            .uri("/vouchers?plan_id=yearly")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn blank_phone_number_is_rejected() {
        let mut store = MockVoucherStore::new();
        store.expect_active_purchases().never();
        let app = app!(flow(store, MockSms::new()));

        let req = test::TestRequest::post()
            .uri("/vouchers/active")
            .set_json(json!({ "phone_number": "   " }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn no_active_vouchers_reports_inactive() {
        let mut store = MockVoucherStore::new();
        store
            .expect_active_purchases()
            .withf(|phone, _| phone == "0712345678")
            .returning(|_, _| Ok(vec![]));
        let app = app!(flow(store, MockSms::new()));

        let req = test::TestRequest::post()
            .uri("/vouchers/active")
            .set_json(json!({ "phone_number": " 0712345678 " }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["active"], false);
        assert_eq!(body["notification"], "skipped");
    }

    #[actix_web::test]
    async fn taken_voucher_is_a_conflict() {
        let mut store = MockVoucherStore::new();
        store.expect_find_voucher().returning(|_| Ok(None));
        let app = app!(flow(store, MockSms::new()));

        let req = test::TestRequest::post()
            .uri(&format!("/vouchers/{}/purchase", Uuid::new_v4()))
            .set_json(json!({ "phone_number": "0712345678" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn purchase_returns_the_code() {
        let daily = voucher("abc123", "daily");
        let id = daily.id;

        let mut store = MockVoucherStore::new();
        let found = daily.clone();
        store
            .expect_find_voucher()
            .returning(move |_| Ok(Some(found.clone())));
        store.expect_claim_voucher().returning(move |req| {
            let mut used = daily.clone();
            used.is_used = true;
            used.used_at = Some(req.purchased_at);
            Ok(Some((
                used,
                Purchase {
                    id: Uuid::new_v4(),
                    voucher_id: req.voucher_id,
                    phone_number: req.phone_number,
                    purchased_at: req.purchased_at,
                    expires_at: req.expires_at,
                },
            )))
        });

        let mut sms = MockSms::new();
        sms.expect_send_sms()
            .returning(|_, _| Err(AppError::Internal("gateway down".to_string())));
        let app = app!(flow(store, sms));

        let req = test::TestRequest::post()
            .uri(&format!("/vouchers/{}/purchase", id))
            .set_json(json!({ "phone_number": "0712345678" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["voucher"]["code"], "abc123");
        assert_eq!(body["voucher"]["is_used"], true);
        assert_eq!(body["plan_name"], "Luco-Day Plan");
        assert_eq!(body["notification"], "failed");
    }

    #[actix_web::test]
    async fn malformed_voucher_id_is_rejected() {
        let app = app!(flow(MockVoucherStore::new(), MockSms::new()));

        let req = test::TestRequest::post()
            .uri("/vouchers/not-a-uuid/purchase")
            .set_json(json!({ "phone_number": "0712345678" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
