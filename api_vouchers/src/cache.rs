use std::time::{Duration, Instant};

use dashmap::DashMap;
use db::models::voucher::Voucher;

struct Entry {
    vouchers: Vec<Voucher>,
    stored_at: Instant,
}

/// Short-lived per-plan copy of the unused voucher list.
///
/// Purchases and imports invalidate the affected plan; the TTL bounds how
/// stale a listing can get when another process changes the table.
pub struct AvailabilityCache {
    ttl: Duration,
    entries: DashMap<String, Entry>,
}

impl AvailabilityCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, plan_id: &str) -> Option<Vec<Voucher>> {
        if self.ttl.is_zero() {
            return None;
        }

        let expired = match self.entries.get(plan_id) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Some(entry.vouchers.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(plan_id);
        }
        None
    }

    pub fn put(&self, plan_id: &str, vouchers: Vec<Voucher>) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.insert(
            plan_id.to_string(),
            Entry {
                vouchers,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, plan_id: &str) {
        if self.entries.remove(plan_id).is_some() {
            log::debug!("Invalidated cached vouchers for plan {}", plan_id);
        }
    }
}
