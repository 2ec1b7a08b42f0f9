use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{error::Res, http::Success, jwt::AdminClaims};

use crate::{dtos::admin::ImportQuery, services, state::AdminState};

/// Lists the whole voucher inventory with usage counts.
///
/// # Output
/// - Success: `{ "vouchers": { "<plan_id>": [...] }, "stats": { "total", "used", "available" },
///   "by_plan": { "<plan_id>": { "total", "used", "available" } } }`
#[get("/vouchers")]
pub async fn get_vouchers(state: web::Data<Arc<AdminState>>) -> Res<impl Responder> {
    let vouchers = state.store.all_vouchers().await?;
    Success::ok(services::inventory::summarize(vouchers, &state.catalog))
}

/// Imports voucher codes from a hotspot user export.
///
/// # Input
/// - `query`: `?plan_id=daily`
/// - `body`: the CSV file as `text/csv`; codes are read from its `Username` column
///
/// # Output
/// - Success: `{ "plan_id", "plan_name", "inserted" }` with 201 Created
/// - Error: 400 Bad Request when the file or plan is not valid; nothing is inserted
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch(`/api/admin/vouchers/import?plan_id=${planId}`, {
///   method: 'POST',
///   credentials: 'include',
///   headers: { 'Content-Type': 'text/csv' },
///   body: await file.text()
/// });
/// ```
#[post("/vouchers/import")]
pub async fn post_import(
    query: web::Query<ImportQuery>,
    body: String,
    claims: web::ReqData<AdminClaims>,
    state: web::Data<Arc<AdminState>>,
) -> Res<impl Responder> {
    log::info!(
        "Admin {} is importing vouchers into {}",
        claims.username,
        query.plan_id
    );
    let summary = services::import::import_vouchers(&state, &query.plan_id, &body).await?;
    Success::created(summary)
}
