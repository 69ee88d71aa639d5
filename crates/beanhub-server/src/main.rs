//! BeanHub server binary.

use std::fmt;

use beanhub_server::config::loader::load_config;
use beanhub_server::{ServerBuilder, apply_logging_level, init_tracing, metrics};

/// Where the configuration path came from, for the startup log line.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    CliArgument,
    EnvironmentVariable,
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (BEANHUB_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// `--config <path>` wins, then `BEANHUB_CONFIG`, then `beanhub.toml`.
fn resolve_config_path() -> (String, ConfigSource) {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config"
            && let Some(path) = args.next()
        {
            return (path, ConfigSource::CliArgument);
        }
    }

    if let Ok(path) = std::env::var("BEANHUB_CONFIG") {
        return (path, ConfigSource::EnvironmentVariable);
    }

    ("beanhub.toml".to_string(), ConfigSource::Default)
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; anything else is worth a warning.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    init_tracing();

    let (config_path, source) = resolve_config_path();
    let config = match load_config(Some(&config_path)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            std::process::exit(2);
        }
    };
    tracing::info!(path = %config_path, source = %source, "Configuration loaded");

    apply_logging_level(&config.logging.level);
    metrics::init_metrics();

    let server = match ServerBuilder::new().with_config(config).build().await {
        Ok(server) => server,
        Err(err) => {
            eprintln!("Failed to start server: {err:#}");
            std::process::exit(2);
        }
    };

    if let Err(err) = server.run().await {
        eprintln!("Server error: {err:#}");
        std::process::exit(1);
    }
}
