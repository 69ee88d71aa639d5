//! Wire types for the BeanHub HTTP API: request DTOs with validation, and
//! the error surface handlers return to clients.
//!
//! Responses serialize the domain types from `beanhub-core` directly (their
//! serde shape is the wire shape); only requests get dedicated DTOs, because
//! creation has no id yet and update must cross-check the path id.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use beanhub_core::{CoffeeBean, CoreError};
use beanhub_storage::NewBean;

// -------------------------
// Request DTOs + validation
// -------------------------

const MAX_COLOUR_LEN: usize = 50;
const MAX_COUNTRY_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 500;

/// Body of `POST /coffeeBeans`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoffeeBeanRequest {
    pub name: String,
    pub colour: String,
    pub country: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: BigDecimal,
    pub image_url: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Body of `PUT /coffeeBeans/{id}`.
///
/// The body may carry an `id`; when present it must match the path id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoffeeBeanRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub colour: String,
    pub country: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: BigDecimal,
    pub image_url: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Field-level checks shared by create and update.
///
/// Error messages use the wire (camelCase) field names, since that is what
/// the caller sent.
fn validate_fields(
    name: &str,
    colour: &str,
    country: &str,
    description: Option<&str>,
    price: &BigDecimal,
    image_url: &str,
) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    if colour.trim().is_empty() {
        return Err(ApiError::bad_request("colour must not be empty"));
    }
    if colour.chars().count() > MAX_COLOUR_LEN {
        return Err(ApiError::bad_request(format!(
            "colour must be at most {MAX_COLOUR_LEN} characters"
        )));
    }
    if country.trim().is_empty() {
        return Err(ApiError::bad_request("country must not be empty"));
    }
    if country.chars().count() > MAX_COUNTRY_LEN {
        return Err(ApiError::bad_request(format!(
            "country must be at most {MAX_COUNTRY_LEN} characters"
        )));
    }
    if let Some(description) = description
        && description.chars().count() > MAX_DESCRIPTION_LEN
    {
        return Err(ApiError::bad_request(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    if *price < BigDecimal::from(0) {
        return Err(ApiError::bad_request("price must not be negative"));
    }
    if image_url.trim().is_empty() {
        return Err(ApiError::bad_request("imageUrl must not be empty"));
    }
    Ok(())
}

impl CreateCoffeeBeanRequest {
    /// Validates the request and converts it into a storage `NewBean`.
    pub fn into_new_bean(self) -> Result<NewBean, ApiError> {
        validate_fields(
            &self.name,
            &self.colour,
            &self.country,
            self.description.as_deref(),
            &self.price,
            &self.image_url,
        )?;

        Ok(NewBean {
            name: self.name,
            colour: self.colour,
            country: self.country,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            available: self.available,
        })
    }
}

impl UpdateCoffeeBeanRequest {
    /// Validates the request against the path id and converts it into the
    /// full replacement bean.
    ///
    /// A body id that disagrees with the path id is a `400`; an absent body
    /// id is fine (the path id wins).
    pub fn into_bean(self, path_id: i64) -> Result<CoffeeBean, ApiError> {
        if let Some(body_id) = self.id
            && body_id != path_id
        {
            return Err(ApiError::bad_request(format!(
                "id in body ({body_id}) does not match id in path ({path_id})"
            )));
        }

        validate_fields(
            &self.name,
            &self.colour,
            &self.country,
            self.description.as_deref(),
            &self.price,
            &self.image_url,
        )?;

        Ok(CoffeeBean {
            id: path_id,
            name: self.name,
            colour: self.colour,
            country: self.country,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            available: self.available,
        })
    }
}


// -------------------------
// API error surface
// -------------------------

/// JSON body every error response carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Machine-readable tag, e.g. `not_found`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// High-level API errors mapped to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Maps a domain error to its HTTP rendering.
    ///
    /// With `development` set, 500 responses carry the underlying message;
    /// otherwise they carry a generic one so internals never leak to
    /// clients. 404/400 messages are client-safe either way.
    pub fn from_core(err: &CoreError, development: bool) -> Self {
        match err {
            CoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            CoreError::ValidationFailed { .. } | CoreError::InvalidDate(_) => {
                Self::BadRequest(err.to_string())
            }
            CoreError::DataAccessFailed { .. } => {
                if development {
                    Self::Internal(err.to_string())
                } else {
                    Self::Internal("A data access error occurred.".into())
                }
            }
            _ => {
                if development {
                    Self::Internal(err.to_string())
                } else {
                    Self::Internal("An unexpected error occurred.".into())
                }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_tag(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.error_tag().into(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_error_body())).into_response()
    }
}
