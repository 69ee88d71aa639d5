//! PostgreSQL implementations of the storage traits.

use async_trait::async_trait;
use sqlx_postgres::PgPool;

use beanhub_core::{CoffeeBean, DailySelection, SelectionDate};
use beanhub_storage::{CatalogStore, DailySelectionStore, NewBean, StorageError};

use crate::config::PostgresConfig;
use crate::migrations;
use crate::pool;
use crate::queries;

/// PostgreSQL-backed catalog store.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new `PostgresCatalog` with its own connection pool.
    ///
    /// This will:
    /// 1. Create a connection pool
    /// 2. Run migrations (if configured)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresCatalog` from an existing connection pool.
    ///
    /// This allows sharing a connection pool between multiple components.
    /// Migrations are not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalog {
    async fn list_available(&self) -> Result<Vec<CoffeeBean>, StorageError> {
        queries::beans::list_available(&self.pool).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<CoffeeBean>, StorageError> {
        queries::beans::get_by_id(&self.pool, id).await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<CoffeeBean>, StorageError> {
        queries::beans::search(&self.pool, keyword).await
    }

    async fn add(&self, bean: NewBean) -> Result<CoffeeBean, StorageError> {
        queries::beans::insert(&self.pool, &bean).await
    }

    async fn update(&self, bean: &CoffeeBean) -> Result<CoffeeBean, StorageError> {
        queries::beans::update(&self.pool, bean).await
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        queries::beans::delete(&self.pool, id).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// PostgreSQL-backed daily selection store.
///
/// The unique constraint on `daily_selections.date` is what arbitrates
/// concurrent selection attempts; see [`queries::selections::insert`].
#[derive(Debug, Clone)]
pub struct PostgresSelections {
    pool: PgPool,
}

impl PostgresSelections {
    /// Creates a new `PostgresSelections` with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresSelections` from an existing connection pool.
    ///
    /// This allows sharing a connection pool between multiple components.
    /// Migrations are not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DailySelectionStore for PostgresSelections {
    async fn get_by_date(
        &self,
        date: SelectionDate,
    ) -> Result<Option<DailySelection>, StorageError> {
        queries::selections::get_by_date(&self.pool, date).await
    }

    async fn add(
        &self,
        bean_id: i64,
        date: SelectionDate,
    ) -> Result<DailySelection, StorageError> {
        queries::selections::insert(&self.pool, bean_id, date).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
