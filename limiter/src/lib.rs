use middleware::global::GlobalLimiter;

pub mod middleware {
    pub mod global;
}

/// Build once and clone into every worker so they share one quota.
pub fn global_middleware(permits_per_second: u32) -> GlobalLimiter {
    GlobalLimiter::new(permits_per_second)
}
