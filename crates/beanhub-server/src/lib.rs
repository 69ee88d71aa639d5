//! # beanhub-server
//!
//! HTTP server for the BeanHub coffee catalog: CRUD and search endpoints,
//! a daily featured bean, read-through response caching, configuration,
//! seeding, metrics and health probes.
//!
//! The binary entry point lives in `main.rs`; everything it wires together
//! is exported here so integration tests can assemble the same app.

pub mod cache;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod seed;
pub mod server;

pub use cache::{CacheBackend, CacheStats, CatalogCache};
pub use config::{AppConfig, LoggingConfig, PostgresSettings, SeedConfig, ServerConfig, StorageConfig};
pub use observability::{apply_logging_level, init_tracing, init_tracing_with_level};
pub use server::{AppState, BeanhubServer, ServerBuilder, build_app};
