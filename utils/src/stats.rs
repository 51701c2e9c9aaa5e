//! Statistics collection for ledger operations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter names tracked by the issuer.
pub const OPS_PROCESSED: &str = "ops_processed";
pub const MEMBERSHIPS_SOLD: &str = "memberships_sold";
pub const UNITS_MINTED: &str = "units_minted";
pub const DEPOSITS_RECEIVED: &str = "deposits_received";
pub const PAYOUTS_COMPLETED: &str = "payouts_completed";
pub const PAYOUTS_REJECTED: &str = "payouts_rejected";

/// A thread-safe counter collection for operation statistics.
pub struct StatsCounter {
    counters: HashMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let mut counters = HashMap::new();
        for &name in names {
            counters.insert(name, AtomicU64::new(0));
        }
        Self { counters }
    }

    /// The standard counter set for a Lodge issuer.
    pub fn lodge() -> Self {
        Self::new(&[
            OPS_PROCESSED,
            MEMBERSHIPS_SOLD,
            UNITS_MINTED,
            DEPOSITS_RECEIVED,
            PAYOUTS_COMPLETED,
            PAYOUTS_REJECTED,
        ])
    }

    pub fn increment(&self, name: &str) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> HashMap<&'static str, u64> {
        self.counters
            .iter()
            .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
            .collect()
    }
}
