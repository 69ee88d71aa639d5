//! # beanhub-storage
//!
//! Storage abstraction layer for the BeanHub catalog service.
//!
//! This crate defines the traits and types that all storage backends must
//! implement. It does not contain any implementations - those are provided by
//! separate crates (`beanhub-db-memory`, `beanhub-db-postgres`).
//!
//! ## Overview
//!
//! Two traits make up the contract:
//! - [`CatalogStore`] - CRUD and substring search over catalog items
//! - [`DailySelectionStore`] - one selection record per calendar date, with
//!   storage-level uniqueness on the date key
//!
//! ## Example
//!
//! ```ignore
//! use beanhub_storage::{CatalogStore, StorageError};
//!
//! async fn count_available(store: &dyn CatalogStore) -> Result<usize, StorageError> {
//!     Ok(store.list_available().await?.len())
//! }
//! ```

mod error;
mod traits;
mod types;

// Re-export everything from submodules
pub use error::{ErrorCategory, StorageError};
pub use traits::{CatalogStore, DailySelectionStore};
pub use types::NewBean;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared catalog store trait object.
pub type DynCatalogStore = std::sync::Arc<dyn CatalogStore>;

/// Type alias for a shared daily-selection store trait object.
pub type DynSelectionStore = std::sync::Arc<dyn DailySelectionStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use beanhub_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::{CatalogStore, DailySelectionStore};
    pub use crate::types::NewBean;
    pub use crate::{DynCatalogStore, DynSelectionStore, StorageResult};
}
