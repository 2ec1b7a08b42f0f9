use std::sync::Arc;

use actix_web::{Responder, get, web};
use common::{error::Res, http::Success};
use serde::Serialize;

use crate::models::plan::{DurationRule, Plan, PlanCatalog};

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub currency: String,
    pub display_price: String,
    pub description: String,
    pub duration: DurationRule,
}

impl From<&Plan> for PlanResponse {
    fn from(plan: &Plan) -> Self {
        PlanResponse {
            id: plan.id.clone(),
            name: plan.name.clone(),
            price: plan.price,
            currency: plan.currency.clone(),
            display_price: plan.display_price(),
            description: plan.description.clone(),
            duration: plan.duration,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanResponse>,
}

/// Lists the plans a customer can pick from.
///
/// # Output
/// - Success: `{ "plans": [...] }` in catalog order
#[get("")]
pub async fn get_plans(catalog: web::Data<Arc<PlanCatalog>>) -> Res<impl Responder> {
    Success::ok(PlansResponse {
        plans: catalog.plans().iter().map(PlanResponse::from).collect(),
    })
}
