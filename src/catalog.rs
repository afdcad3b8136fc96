use crate::aggregator::drop_blacklisted;
use crate::data_models::{Shop, UserPreferences};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Holds the most recently fetched shop list so screens can be kept
/// consistent with preference changes without refetching.
///
/// Every search gets a generation id from [`ShopCatalog::begin_search`];
/// [`ShopCatalog::store`] rejects results from a generation older than the
/// one already held, so an overlapping slow search cannot clobber the
/// results of a newer one.
#[derive(Debug, Default)]
pub struct ShopCatalog {
    shops: RwLock<Vec<Shop>>,
    next_generation: AtomicU64,
    stored_generation: AtomicU64,
}

impl ShopCatalog {
    pub fn begin_search(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn store(&self, generation: u64, shops: Vec<Shop>) -> bool {
        let mut held = self.shops.write().unwrap();
        if generation < self.stored_generation.load(Ordering::SeqCst) {
            tracing::debug!(generation, "discarding stale search result");
            return false;
        }
        self.stored_generation.store(generation, Ordering::SeqCst);
        *held = shops;
        true
    }

    pub fn current(&self) -> Vec<Shop> {
        let shops = self.shops.read().unwrap();
        shops.clone()
    }

    /// Re-applies the blacklist filter to the held list. Called whenever
    /// blacklist membership changes; favorites changes do not need it.
    pub fn apply_blacklist(&self, prefs: &UserPreferences) {
        let mut shops = self.shops.write().unwrap();
        drop_blacklisted(&mut shops, prefs);
    }
}
