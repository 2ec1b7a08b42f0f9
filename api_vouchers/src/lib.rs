use actix_web::web;

pub mod cache;
pub mod store;

pub mod routes {
    pub mod voucher;
}

pub mod services {
    pub mod flow;
    pub mod listing;
    pub mod lookup;
    pub mod purchase;
}

mod dtos {
    pub(crate) mod voucher;
}

pub use cache::AvailabilityCache;
pub use services::flow::VoucherFlow;
pub use store::{PgVoucherStore, VoucherStore};

pub fn mount_vouchers() -> actix_web::Scope {
    web::scope("/vouchers")
        .service(routes::voucher::get_vouchers)
        .service(routes::voucher::post_active)
        .service(routes::voucher::post_purchase)
}
