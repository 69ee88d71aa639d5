//! HTTP server assembly: shared state, router and lifecycle.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    middleware,
    routing::get,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use beanhub_db_memory::{InMemoryCatalog, InMemorySelections};
use beanhub_select::{RandomSelectionStrategy, SelectionService};
use beanhub_storage::{DynCatalogStore, DynSelectionStore};

use crate::cache::{CacheBackend, CatalogCache};
use crate::config::{AppConfig, StorageConfig};
use crate::{handlers, middleware as request_middleware, seed};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: DynCatalogStore,
    pub selection: Arc<SelectionService>,
    pub cache: CatalogCache,
    /// Error responses carry the underlying message when set.
    pub development: bool,
}

/// Creates the storage backends named by the configuration.
async fn build_stores(config: &StorageConfig) -> anyhow::Result<(DynCatalogStore, DynSelectionStore)> {
    match config.backend.as_str() {
        "postgres" => {
            let settings = config
                .postgres
                .as_ref()
                .context("storage.backend = \"postgres\" requires a [storage.postgres] section")?;
            let (catalog, selections) =
                beanhub_db_postgres::create_stores(settings.to_backend_config()).await?;
            Ok((catalog, selections))
        }
        // Validated at load time; anything else would have been rejected.
        _ => {
            let catalog: DynCatalogStore = Arc::new(InMemoryCatalog::new());
            let selections: DynSelectionStore = Arc::new(InMemorySelections::new());
            Ok((catalog, selections))
        }
    }
}

/// Builds the full application router, including storage, seed import and
/// cache.
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let (catalog, selections) = build_stores(&config.storage).await?;
    info!(backend = catalog.backend_name(), "Storage initialized");

    let stats = seed::run(catalog.as_ref(), &config.seed).await?;
    if stats.inserted > 0 {
        info!(inserted = stats.inserted, "Seed catalog imported");
    }

    let strategy = Arc::new(RandomSelectionStrategy::new());
    let selection = Arc::new(SelectionService::new(
        catalog.clone(),
        selections,
        strategy,
    ));

    let state = AppState {
        catalog,
        selection,
        cache: CatalogCache::new(CacheBackend::new()),
        development: config.server.development,
    };

    Ok(router(state, config))
}

/// Assembles routes and the middleware stack around existing state.
pub fn router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route("/metrics", get(handlers::metrics))
        // Browser favicon shortcut
        .route("/favicon.ico", get(handlers::favicon))
        .route(
            "/coffeeBeans",
            get(handlers::list_beans).post(handlers::create_bean),
        )
        .route("/coffeeBeans/search", get(handlers::search_beans))
        .route("/coffeeBeans/bean-of-the-day", get(handlers::bean_of_the_day))
        .route(
            "/coffeeBeans/{id}",
            get(handlers::get_bean)
                .put(handlers::update_bean)
                .delete(handlers::delete_bean),
        )
        // Middleware stack, outermost first: body limit -> request id ->
        // metrics -> cors -> compression -> trace (layers apply bottom-up,
        // and request_id must run before the trace span reads the extension)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    // No span for browser favicon requests, they only add noise
                    if req.uri().path() == "/favicon.ico" {
                        return tracing::span!(tracing::Level::TRACE, "noop");
                    }
                    let request_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %request_id,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        if let Some(meta) = span.metadata()
                            && meta.name() != "noop"
                        {
                            tracing::info!(
                                http.status = %res.status().as_u16(),
                                elapsed_ms = %latency.as_millis(),
                                "request handled"
                            );
                        }
                    },
                ),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_middleware::track_requests))
        .layer(middleware::from_fn(request_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(
            config.server.body_limit_bytes,
        ))
        .with_state(state)
}

/// Builder for the HTTP server.
pub struct ServerBuilder {
    config: AppConfig,
}

impl ServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> anyhow::Result<BeanhubServer> {
        let addr = self.config.addr();
        let app = build_app(&self.config).await?;
        Ok(BeanhubServer { addr, app })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully assembled server, ready to listen.
pub struct BeanhubServer {
    addr: std::net::SocketAddr,
    app: Router,
}

impl BeanhubServer {
    /// Serves until ctrl-c.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.addr))?;
        info!("BeanHub server listening on http://{}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
