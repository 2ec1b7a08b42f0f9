use std::sync::Arc;

use api_plans::PlanCatalog;
use notifier::SmsSender;

use crate::{cache::AvailabilityCache, store::VoucherStore};

/// Everything the customer flow needs, handed to each request explicitly.
///
/// The operations live next to each other in `lookup`, `listing` and
/// `purchase`.
pub struct VoucherFlow {
    pub(crate) store: Arc<dyn VoucherStore>,
    pub(crate) sms: Arc<dyn SmsSender>,
    pub(crate) catalog: Arc<PlanCatalog>,
    pub(crate) cache: Arc<AvailabilityCache>,
    pub(crate) brand_name: String,
}

impl VoucherFlow {
    pub fn new(
        store: Arc<dyn VoucherStore>,
        sms: Arc<dyn SmsSender>,
        catalog: Arc<PlanCatalog>,
        cache: Arc<AvailabilityCache>,
        brand_name: String,
    ) -> Self {
        Self {
            store,
            sms,
            catalog,
            cache,
            brand_name,
        }
    }
}
