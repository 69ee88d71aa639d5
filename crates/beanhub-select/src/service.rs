//! The "bean of the day" orchestration service.
//!
//! `SelectionService` glues the catalog store, the selection store and a
//! selection strategy together behind one idempotent operation: get (or
//! select and persist) the bean featured on the current UTC day.

use tracing::{debug, info, instrument};

use beanhub_core::{CoffeeBean, CoreError, Result, SelectionDate};
use beanhub_storage::{DynCatalogStore, DynSelectionStore};

use crate::strategy::DynSelectionStrategy;

/// Orchestrates daily selection of the featured bean.
///
/// Concurrency: the service itself holds no mutable state. The per-day
/// uniqueness guarantee comes entirely from the selection store rejecting a
/// second insert for the same date; a caller that loses that race discards
/// its local pick and converges on the winner's record.
pub struct SelectionService {
    catalog: DynCatalogStore,
    selections: DynSelectionStore,
    strategy: DynSelectionStrategy,
}

impl SelectionService {
    /// Creates a service over the given stores and strategy.
    #[must_use]
    pub fn new(
        catalog: DynCatalogStore,
        selections: DynSelectionStore,
        strategy: DynSelectionStrategy,
    ) -> Self {
        Self {
            catalog,
            selections,
            strategy,
        }
    }

    /// Returns the bean featured today (UTC), selecting and persisting one
    /// if no record exists yet for the current date.
    ///
    /// Repeated calls on the same day return the same bean; the strategy is
    /// only consulted when the day has no recorded selection.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoCandidatesAvailable`] if no beans are available.
    /// - [`CoreError::NoAlternativeAvailable`] if the only available bean
    ///   was already featured yesterday.
    /// - [`CoreError::NotFound`] if the recorded selection references a
    ///   bean that no longer exists.
    /// - [`CoreError::DataAccessFailed`] if a store operation fails.
    pub async fn get_todays_item(&self) -> Result<CoffeeBean> {
        self.get_item_for(SelectionDate::today_utc()).await
    }

    /// Date-parameterized variant of [`Self::get_todays_item`].
    ///
    /// Tests drive this directly so they do not depend on the wall clock;
    /// production code always passes the current UTC date.
    #[instrument(skip(self), fields(date = %today))]
    pub async fn get_item_for(&self, today: SelectionDate) -> Result<CoffeeBean> {
        // Fast path: today's selection already exists.
        if let Some(existing) = self.selections.get_by_date(today).await? {
            debug!(bean_id = existing.bean_id, "Serving recorded selection");
            return self.resolve(existing.bean_id).await;
        }

        let candidates = self.catalog.list_available().await?;

        let previous = match self.selections.get_previous_day(today).await? {
            Some(prev) => self.catalog.get_by_id(prev.bean_id).await?,
            None => None,
        };

        let chosen = self.strategy.select(&candidates, previous.as_ref())?;

        match self.selections.add(chosen.id, today).await {
            Ok(selection) => {
                info!(
                    bean_id = selection.bean_id,
                    selection_id = selection.id,
                    "Recorded bean of the day"
                );
                Ok(chosen)
            }
            Err(e) if e.is_already_exists() => {
                // Lost the first-insert race; the winner's record stands.
                debug!("Selection already recorded, converging on the winner");
                match self.selections.get_by_date(today).await? {
                    Some(winner) => self.resolve(winner.bean_id).await,
                    None => Err(CoreError::data_access(format!(
                        "selection for {today} disappeared after insert conflict"
                    ))),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves a recorded bean id through the catalog.
    async fn resolve(&self, bean_id: i64) -> Result<CoffeeBean> {
        match self.catalog.get_by_id(bean_id).await? {
            Some(bean) => Ok(bean),
            None => Err(CoreError::not_found(bean_id)),
        }
    }
}
