//! Cache coordinator for catalog responses.
//!
//! Owns key construction, per-family TTLs and the invalidation rules. All
//! cached values are serialized JSON response bodies, so a hit bypasses
//! storage and serialization entirely.
//!
//! Key families:
//! - `beans:all` for the full listing (10 minutes)
//! - `beans:id:{id}` per item (10 minutes)
//! - `beans:search:{keyword}` per lowercased search keyword (5 minutes)
//! - `beans:day:{YYYY-MM-DD}` per daily selection (24 hours)
//!
//! Create drops the listing; update and delete drop the listing and the
//! item entry. Search and day entries are never dropped actively, they
//! only age out.

use std::sync::Arc;
use std::time::Duration;

use beanhub_core::SelectionDate;

use super::backend::{CacheBackend, CacheStats};

/// Key for the full catalog listing.
pub const ALL_KEY: &str = "beans:all";

const ALL_TTL: Duration = Duration::from_secs(10 * 60);
const ID_TTL: Duration = Duration::from_secs(10 * 60);
const SEARCH_TTL: Duration = Duration::from_secs(5 * 60);
const DAY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Read-through cache for catalog endpoints.
#[derive(Clone)]
pub struct CatalogCache {
    backend: CacheBackend,
}

impl CatalogCache {
    pub fn new(backend: CacheBackend) -> Self {
        Self { backend }
    }

    #[inline]
    fn id_key(id: i64) -> String {
        format!("beans:id:{id}")
    }

    /// Search keys are lowercased so casing variants of a keyword share one
    /// entry, matching the case-insensitive search semantics.
    #[inline]
    fn search_key(keyword: &str) -> String {
        format!("beans:search:{}", keyword.to_lowercase())
    }

    #[inline]
    fn day_key(date: SelectionDate) -> String {
        format!("beans:day:{date}")
    }

    pub fn get_all(&self) -> Option<Arc<Vec<u8>>> {
        self.lookup(ALL_KEY, "all")
    }

    pub fn put_all(&self, body: Vec<u8>) {
        self.backend.set(ALL_KEY, body, ALL_TTL);
    }

    pub fn get_by_id(&self, id: i64) -> Option<Arc<Vec<u8>>> {
        self.lookup(&Self::id_key(id), "id")
    }

    pub fn put_by_id(&self, id: i64, body: Vec<u8>) {
        self.backend.set(&Self::id_key(id), body, ID_TTL);
    }

    pub fn get_search(&self, keyword: &str) -> Option<Arc<Vec<u8>>> {
        self.lookup(&Self::search_key(keyword), "search")
    }

    pub fn put_search(&self, keyword: &str, body: Vec<u8>) {
        self.backend.set(&Self::search_key(keyword), body, SEARCH_TTL);
    }

    pub fn get_day(&self, date: SelectionDate) -> Option<Arc<Vec<u8>>> {
        self.lookup(&Self::day_key(date), "day")
    }

    pub fn put_day(&self, date: SelectionDate, body: Vec<u8>) {
        self.backend.set(&Self::day_key(date), body, DAY_TTL);
    }

    fn lookup(&self, key: &str, family: &'static str) -> Option<Arc<Vec<u8>>> {
        let found = self.backend.get(key);
        if found.is_some() {
            crate::metrics::record_cache_hit(family);
        } else {
            crate::metrics::record_cache_miss(family);
        }
        found
    }

    /// After a successful create: only the listing is stale, since the new
    /// item cannot be in any cached single-item entry yet.
    pub fn invalidate_after_create(&self) {
        self.backend.invalidate(ALL_KEY);
    }

    /// After a successful update or delete: the listing and the item entry
    /// are stale. Only called after the mutation has been persisted; a
    /// failed write leaves every entry untouched.
    pub fn invalidate_after_write(&self, id: i64) {
        self.backend.invalidate(ALL_KEY);
        self.backend.invalidate(&Self::id_key(id));
    }

    pub fn stats(&self) -> CacheStats {
        self.backend.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn cache() -> CatalogCache {
        CatalogCache::new(CacheBackend::new())
    }

    #[test]
    fn test_all_roundtrip() {
        let cache = cache();
        assert!(cache.get_all().is_none());

        cache.put_all(b"[1,2]".to_vec());
        let got = cache.get_all().expect("listing should be cached");
        assert_eq!(got.as_slice(), b"[1,2]");
    }

    #[test]
    fn test_id_entries_are_per_item() {
        let cache = cache();
        cache.put_by_id(1, b"one".to_vec());
        cache.put_by_id(2, b"two".to_vec());

        assert_eq!(cache.get_by_id(1).expect("cached").as_slice(), b"one");
        assert_eq!(cache.get_by_id(2).expect("cached").as_slice(), b"two");
        assert!(cache.get_by_id(3).is_none());
    }

    #[test]
    fn test_search_key_is_case_insensitive() {
        let cache = cache();
        cache.put_search("colombia", b"[]".to_vec());

        assert!(cache.get_search("Colombia").is_some());
        assert!(cache.get_search("COLOMBIA").is_some());
        assert!(cache.get_search("kenya").is_none());
    }

    #[test]
    fn test_day_entries_are_per_date() {
        let cache = cache();
        let monday = SelectionDate::new(date!(2025 - 05 - 05));
        cache.put_day(monday, b"bean".to_vec());

        assert!(cache.get_day(monday).is_some());
        assert!(cache.get_day(monday.next_day()).is_none());
    }

    #[test]
    fn test_create_invalidates_only_the_listing() {
        let cache = cache();
        cache.put_all(b"[]".to_vec());
        cache.put_by_id(1, b"one".to_vec());
        cache.put_search("kenya", b"[]".to_vec());

        cache.invalidate_after_create();

        assert!(cache.get_all().is_none());
        assert!(cache.get_by_id(1).is_some());
        assert!(cache.get_search("kenya").is_some());
    }

    #[test]
    fn test_write_invalidates_listing_and_item() {
        let cache = cache();
        let today = SelectionDate::new(date!(2025 - 05 - 05));
        cache.put_all(b"[]".to_vec());
        cache.put_by_id(1, b"one".to_vec());
        cache.put_by_id(2, b"two".to_vec());
        cache.put_search("kenya", b"[]".to_vec());
        cache.put_day(today, b"bean".to_vec());

        cache.invalidate_after_write(1);

        assert!(cache.get_all().is_none());
        assert!(cache.get_by_id(1).is_none());
        // Other families and other ids stay warm.
        assert!(cache.get_by_id(2).is_some());
        assert!(cache.get_search("kenya").is_some());
        assert!(cache.get_day(today).is_some());
    }

    #[test]
    fn test_stats_counts_entries() {
        let cache = cache();
        cache.put_all(b"[]".to_vec());
        cache.put_by_id(1, b"one".to_vec());
        assert_eq!(cache.stats().entries, 2);
    }
}
