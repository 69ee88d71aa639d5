//! Read-through TTL caching for catalog responses.
//!
//! [`backend`] is the policy-free TTL map; [`catalog`] layers the key
//! scheme, TTLs and invalidation rules on top of it. Handlers only talk to
//! [`CatalogCache`].

pub mod backend;
pub mod catalog;

pub use backend::{CacheBackend, CacheStats, CachedEntry};
pub use catalog::CatalogCache;
