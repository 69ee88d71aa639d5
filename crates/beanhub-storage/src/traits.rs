//! Storage traits for the BeanHub storage abstraction layer.
//!
//! This module defines the contracts that all storage backends must implement.

use async_trait::async_trait;

use beanhub_core::{CoffeeBean, DailySelection, SelectionDate};

use crate::error::StorageError;
use crate::types::NewBean;

/// Durable storage of catalog items.
///
/// Implementations must be thread-safe (`Send + Sync`); handlers call these
/// methods concurrently. Reads distinguish "absent" (`Ok(None)`) from
/// infrastructure failure (`Err`).
///
/// # Example
///
/// ```ignore
/// use beanhub_storage::{CatalogStore, StorageError};
///
/// async fn get_bean(store: &dyn CatalogStore, id: i64) -> Result<CoffeeBean, StorageError> {
///     store
///         .get_by_id(id)
///         .await?
///         .ok_or_else(|| StorageError::not_found("CoffeeBean", id.to_string()))
/// }
/// ```
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Lists every item whose availability flag is set.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn list_available(&self) -> Result<Vec<CoffeeBean>, StorageError>;

    /// Reads a single item by id. Returns `None` if the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing items.
    async fn get_by_id(&self, id: i64) -> Result<Option<CoffeeBean>, StorageError>;

    /// Case-insensitive substring search against name, country, or colour.
    ///
    /// A match on any one field qualifies. Availability is not filtered here;
    /// only `list_available` applies that filter.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn search(&self, keyword: &str) -> Result<Vec<CoffeeBean>, StorageError>;

    /// Creates a new item. The store assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidData` if the item is malformed.
    async fn add(&self, bean: NewBean) -> Result<CoffeeBean, StorageError>;

    /// Replaces an existing item in place. All fields except `id` are
    /// replaceable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the item does not exist.
    async fn update(&self, bean: &CoffeeBean) -> Result<CoffeeBean, StorageError>;

    /// Deletes an item by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the item does not exist.
    async fn delete(&self, id: i64) -> Result<(), StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Durable storage of one selection record per calendar date.
///
/// The uniqueness of `date` is the load-bearing guarantee: `add` must reject
/// a second record for the same date at the storage level, never overwrite.
/// Callers resolve the rejection by re-reading the winner's record.
#[async_trait]
pub trait DailySelectionStore: Send + Sync {
    /// Reads the selection recorded for `date`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn get_by_date(&self, date: SelectionDate)
    -> Result<Option<DailySelection>, StorageError>;

    /// Reads the selection recorded for the day before `today`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn get_previous_day(
        &self,
        today: SelectionDate,
    ) -> Result<Option<DailySelection>, StorageError> {
        self.get_by_date(today.previous_day()).await
    }

    /// Records the selection for `date`. The store assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if a record for `date` already
    /// exists. This is the first-insert-wins mechanism concurrent callers
    /// rely on; the error carries the date as its key.
    async fn add(&self, bean_id: i64, date: SelectionDate)
    -> Result<DailySelection, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
