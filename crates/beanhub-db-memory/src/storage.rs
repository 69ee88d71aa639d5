use papaya::HashMap as PapayaHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use beanhub_core::{CoffeeBean, DailySelection, SelectionDate};
use beanhub_storage::{CatalogStore, DailySelectionStore, NewBean, StorageError};

/// In-memory catalog backend using papaya lock-free HashMap.
///
/// This storage implementation provides:
/// - Lock-free concurrent access via papaya::HashMap
/// - Full CRUD operations keyed by store-assigned i64 id
/// - Case-insensitive substring search over name, country, and colour
#[derive(Debug)]
pub struct InMemoryCatalog {
    /// Main storage using papaya for lock-free concurrent access
    beans: Arc<PapayaHashMap<i64, CoffeeBean>>,
    /// Atomic counter for assigning ids on create
    id_counter: AtomicI64,
}

impl InMemoryCatalog {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self {
            beans: Arc::new(PapayaHashMap::new()),
            id_counter: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.id_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of items currently stored, regardless of availability.
    pub fn count(&self) -> usize {
        let guard = self.beans.pin();
        guard.len()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_available(&self) -> Result<Vec<CoffeeBean>, StorageError> {
        let guard = self.beans.pin();
        let mut beans: Vec<CoffeeBean> = guard
            .iter()
            .filter(|(_, bean)| bean.available)
            .map(|(_, bean)| bean.clone())
            .collect();
        beans.sort_by_key(|bean| bean.id);
        Ok(beans)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<CoffeeBean>, StorageError> {
        let guard = self.beans.pin();
        Ok(guard.get(&id).cloned())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<CoffeeBean>, StorageError> {
        let guard = self.beans.pin();
        let mut beans: Vec<CoffeeBean> = guard
            .iter()
            .filter(|(_, bean)| bean.matches_keyword(keyword))
            .map(|(_, bean)| bean.clone())
            .collect();
        beans.sort_by_key(|bean| bean.id);
        Ok(beans)
    }

    async fn add(&self, bean: NewBean) -> Result<CoffeeBean, StorageError> {
        let id = self.next_id();
        let bean = bean.into_bean(id);
        let guard = self.beans.pin();
        guard.insert(id, bean.clone());
        Ok(bean)
    }

    async fn update(&self, bean: &CoffeeBean) -> Result<CoffeeBean, StorageError> {
        let guard = self.beans.pin();
        if guard.get(&bean.id).is_none() {
            return Err(StorageError::not_found("CoffeeBean", bean.id.to_string()));
        }
        guard.insert(bean.id, bean.clone());
        Ok(bean.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let guard = self.beans.pin();
        if guard.remove(&id).is_none() {
            return Err(StorageError::not_found("CoffeeBean", id.to_string()));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// In-memory daily-selection backend.
///
/// The map is keyed by [`SelectionDate`], and inserts go through papaya's
/// atomic `try_insert` so that exactly one record per date can ever exist,
/// no matter how many callers race on a fresh day. Losers get
/// `StorageError::AlreadyExists` and are expected to re-read.
#[derive(Debug)]
pub struct InMemorySelections {
    selections: Arc<PapayaHashMap<SelectionDate, DailySelection>>,
    id_counter: AtomicI64,
}

impl InMemorySelections {
    /// Creates a new empty selection store.
    pub fn new() -> Self {
        Self {
            selections: Arc::new(PapayaHashMap::new()),
            id_counter: AtomicI64::new(1),
        }
    }

    /// Number of selection records stored.
    pub fn count(&self) -> usize {
        let guard = self.selections.pin();
        guard.len()
    }
}

impl Default for InMemorySelections {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DailySelectionStore for InMemorySelections {
    async fn get_by_date(
        &self,
        date: SelectionDate,
    ) -> Result<Option<DailySelection>, StorageError> {
        let guard = self.selections.pin();
        Ok(guard.get(&date).cloned())
    }

    async fn add(
        &self,
        bean_id: i64,
        date: SelectionDate,
    ) -> Result<DailySelection, StorageError> {
        // The id is taken before the insert; a lost race wastes one id, which
        // is harmless (sequences have gaps in Postgres too).
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let selection = DailySelection::new(id, bean_id, date);
        let guard = self.selections.pin();
        match guard.try_insert(date, selection.clone()) {
            Ok(_) => Ok(selection),
            Err(_) => Err(StorageError::already_exists(
                "DailySelection",
                date.to_string(),
            )),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
