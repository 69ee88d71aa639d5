//! Tracing initialization with a runtime-reloadable log level.
//!
//! The subscriber is installed once at process start. The effective filter
//! can be swapped later (after the configuration file has been read) via
//! [`apply_logging_level`] without re-installing the subscriber.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Installs the global tracing subscriber at the default `info` level.
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when it is set, so ad-hoc debugging does not
/// require touching the configuration file. Calling this twice is a no-op;
/// the first subscriber stays installed.
pub fn init_tracing_with_level(level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        Err(_) => EnvFilter::new(level),
    };

    let (filter_layer, reload_handle) = reload::Layer::new(filter);
    let _ = LOG_RELOAD_HANDLE.set(reload_handle);

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true))
        .try_init();
}

/// Replaces the active log filter, typically with the configured
/// `logging.level` once the configuration file has been loaded.
pub fn apply_logging_level(level: &str) {
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        let next = EnvFilter::new(level);
        if let Err(err) = handle.modify(|filter| *filter = next) {
            tracing::warn!(error = %err, "Failed to apply logging level");
        }
    }
}
