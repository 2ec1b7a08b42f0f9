use actix_web::web::{self};

pub mod models {
    pub mod plan;
}

pub mod routes {
    pub mod plan;
}

pub use models::plan::{DurationRule, Plan, PlanCatalog};

pub fn mount_plans() -> actix_web::Scope {
    web::scope("/plans").service(routes::plan::get_plans)
}
