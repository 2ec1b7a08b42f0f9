use std::sync::Arc;

use api_plans::PlanCatalog;
use api_vouchers::AvailabilityCache;
use common::env_config::JwtConfig;

use crate::store::AdminStore;

/// Shared by every admin route and by the admin guard.
pub struct AdminState {
    pub store: Arc<dyn AdminStore>,
    pub catalog: Arc<PlanCatalog>,
    pub cache: Arc<AvailabilityCache>,
    pub jwt_config: JwtConfig,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{sync::Arc, time::Duration};

    use api_plans::PlanCatalog;
    use api_vouchers::AvailabilityCache;
    use chrono::{DateTime, TimeZone, Utc};
    use common::env_config::JwtConfig;

    use super::AdminState;
    use crate::store::MockAdminStore;

    pub fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "an-admin-session-secret-of-32-bytes!".to_string(),
            expiration_hours: 12,
        }
    }

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap()
    }

    pub fn state(store: MockAdminStore) -> AdminState {
        state_with_cache(store, Arc::new(AvailabilityCache::new(Duration::from_secs(60))))
    }

    pub fn state_with_cache(store: MockAdminStore, cache: Arc<AvailabilityCache>) -> AdminState {
        AdminState {
            store: Arc::new(store),
            catalog: Arc::new(PlanCatalog::standard()),
            cache,
            jwt_config: jwt_config(),
        }
    }
}
