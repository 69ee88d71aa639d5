//! In-memory storage backend for the BeanHub catalog service.
//!
//! This crate provides in-memory implementations of the `CatalogStore` and
//! `DailySelectionStore` traits from `beanhub-storage`, using papaya
//! lock-free HashMaps for concurrent access.
//!
//! The daily-selection map enforces its one-record-per-date invariant with an
//! atomic `try_insert`: under concurrent first-requests-of-the-day exactly one
//! writer wins and everyone else observes `StorageError::AlreadyExists`.
//!
//! # Example
//!
//! ```ignore
//! use beanhub_db_memory::{InMemoryCatalog, InMemorySelections};
//! use beanhub_storage::CatalogStore;
//!
//! let catalog = InMemoryCatalog::new();
//! let beans = catalog.list_available().await?;
//! ```

pub mod storage;

// Re-export the storage traits for convenience
pub use beanhub_storage::{CatalogStore, DailySelectionStore, StorageError};

pub use storage::{InMemoryCatalog, InMemorySelections};

/// Creates a new shareable in-memory catalog store.
pub fn create_catalog_store() -> beanhub_storage::DynCatalogStore {
    std::sync::Arc::new(InMemoryCatalog::new())
}

/// Creates a new shareable in-memory daily-selection store.
pub fn create_selection_store() -> beanhub_storage::DynSelectionStore {
    std::sync::Arc::new(InMemorySelections::new())
}
