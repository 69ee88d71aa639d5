//! HTTP handlers for the catalog API.
//!
//! Read endpoints go through [`CatalogCache`]: a hit serves the cached
//! response body without touching storage or re-serializing; a miss reads
//! storage, stores the encoded body and serves those same bytes. Mutations
//! invalidate only after the write has succeeded.
//!
//! [`CatalogCache`]: crate::cache::CatalogCache

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use beanhub_api::{ApiError, CreateCoffeeBeanRequest, UpdateCoffeeBeanRequest};
use beanhub_core::{CoreError, SelectionDate};
use beanhub_storage::StorageError;

use crate::server::AppState;

// -------------------------------------------------------------------------
// Response helpers
// -------------------------------------------------------------------------

/// Serves a pre-serialized JSON body.
fn json_bytes(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

fn storage_error(state: &AppState, err: StorageError) -> ApiError {
    ApiError::from_core(&CoreError::from(err), state.development)
}

fn core_error(state: &AppState, err: &CoreError) -> ApiError {
    ApiError::from_core(err, state.development)
}

/// Encodes a response body once; the same bytes go to the cache and to the
/// client.
fn encode<T: Serialize>(state: &AppState, value: &T) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(value).map_err(|err| core_error(state, &CoreError::from(err)))
}

// -------------------------------------------------------------------------
// Catalog CRUD
// -------------------------------------------------------------------------

/// `GET /coffeeBeans`: every available item.
pub async fn list_beans(State(state): State<AppState>) -> Result<Response, ApiError> {
    if let Some(cached) = state.cache.get_all() {
        return Ok(json_bytes(cached.as_ref().clone()));
    }

    let beans = state
        .catalog
        .list_available()
        .await
        .map_err(|err| storage_error(&state, err))?;

    let body = encode(&state, &beans)?;
    state.cache.put_all(body.clone());
    Ok(json_bytes(body))
}

/// `GET /coffeeBeans/{id}`: one item, 404 when absent.
pub async fn get_bean(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    if let Some(cached) = state.cache.get_by_id(id) {
        return Ok(json_bytes(cached.as_ref().clone()));
    }

    let bean = state
        .catalog
        .get_by_id(id)
        .await
        .map_err(|err| storage_error(&state, err))?
        .ok_or_else(|| core_error(&state, &CoreError::not_found(id)))?;

    let body = encode(&state, &bean)?;
    state.cache.put_by_id(id, body.clone());
    Ok(json_bytes(body))
}

/// `POST /coffeeBeans`: creates an item, returning it with its assigned id.
pub async fn create_bean(
    State(state): State<AppState>,
    Json(request): Json<CreateCoffeeBeanRequest>,
) -> Result<Response, ApiError> {
    let new_bean = request.into_new_bean()?;

    let created = state
        .catalog
        .add(new_bean)
        .await
        .map_err(|err| storage_error(&state, err))?;

    state.cache.invalidate_after_create();
    info!(id = created.id, name = %created.name, "Coffee bean created");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// `PUT /coffeeBeans/{id}`: replaces an item. The body id, when present,
/// must match the path id.
pub async fn update_bean(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCoffeeBeanRequest>,
) -> Result<Response, ApiError> {
    let bean = request.into_bean(id)?;

    let updated = state
        .catalog
        .update(&bean)
        .await
        .map_err(|err| storage_error(&state, err))?;

    state.cache.invalidate_after_write(id);
    info!(id = updated.id, "Coffee bean updated");
    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// `DELETE /coffeeBeans/{id}`: removes an item, 404 when absent.
pub async fn delete_bean(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state
        .catalog
        .delete(id)
        .await
        .map_err(|err| storage_error(&state, err))?;

    state.cache.invalidate_after_write(id);
    info!(id = id, "Coffee bean deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

// -------------------------------------------------------------------------
// Search
// -------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// `GET /coffeeBeans/search?query=...`: case-insensitive substring search
/// over name, country and colour.
pub async fn search_beans(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let Some(query) = params.query else {
        return Err(ApiError::bad_request("query parameter is required"));
    };

    // Lowercased once so the cache key and the match share one normal form.
    let keyword = query.to_lowercase();

    if let Some(cached) = state.cache.get_search(&keyword) {
        return Ok(json_bytes(cached.as_ref().clone()));
    }

    let results = state
        .catalog
        .search(&keyword)
        .await
        .map_err(|err| storage_error(&state, err))?;

    let body = encode(&state, &results)?;
    state.cache.put_search(&keyword, body.clone());
    Ok(json_bytes(body))
}

// -------------------------------------------------------------------------
// Bean of the day
// -------------------------------------------------------------------------

/// `GET /coffeeBeans/bean-of-the-day`: the stable pick for the current UTC
/// day.
///
/// The date is taken once and used for both the cache key and the
/// selection, so a request straddling midnight cannot cache one day's pick
/// under the other day's key.
pub async fn bean_of_the_day(State(state): State<AppState>) -> Result<Response, ApiError> {
    let today = SelectionDate::today_utc();

    if let Some(cached) = state.cache.get_day(today) {
        return Ok(json_bytes(cached.as_ref().clone()));
    }

    let bean = state
        .selection
        .get_item_for(today)
        .await
        .map_err(|err| core_error(&state, &err))?;

    let body = encode(&state, &bean)?;
    state.cache.put_day(today, body.clone());
    Ok(json_bytes(body))
}

// -------------------------------------------------------------------------
// Service endpoints
// -------------------------------------------------------------------------

/// `GET /`: service banner.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "BeanHub",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /healthz`: liveness probe, no dependencies checked.
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `GET /favicon.ico`: browsers ask for it; answer quietly.
pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// `GET /readyz`: readiness probe. Runs one storage query and reports 503
/// until it succeeds.
pub async fn readyz(State(state): State<AppState>) -> Response {
    // Id 0 is never assigned; the query only proves the backend answers.
    match state.catalog.get_by_id(0).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response(),
        Err(err) => {
            warn!(error = %err, backend = state.catalog.backend_name(), "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> Response {
    crate::metrics::set_cache_entries(state.cache.stats().entries);

    match crate::metrics::render_metrics() {
        Some(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed",
        )
            .into_response(),
    }
}
