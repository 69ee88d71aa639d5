//! Storage types for the BeanHub storage abstraction layer.
//!
//! This module defines the data types used by the storage traits.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use beanhub_core::CoffeeBean;

/// A catalog item as submitted for creation, before the store has assigned
/// an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBean {
    /// Display name of the bean.
    pub name: String,
    /// Roast colour, e.g. "dark roast".
    pub colour: String,
    /// Country of origin.
    pub country: String,
    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Exact decimal price.
    pub price: BigDecimal,
    /// URL of the product image.
    pub image_url: String,
    /// Whether the bean shows up in listings and selection.
    pub available: bool,
}

impl NewBean {
    /// Creates a `NewBean` with the required fields; `description` starts
    /// empty and `available` starts `true`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        colour: impl Into<String>,
        country: impl Into<String>,
        price: BigDecimal,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            colour: colour.into(),
            country: country.into(),
            description: None,
            price,
            image_url: image_url.into(),
            available: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the availability flag.
    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Attaches a store-assigned id, producing the persisted form.
    #[must_use]
    pub fn into_bean(self, id: i64) -> CoffeeBean {
        CoffeeBean {
            id,
            name: self.name,
            colour: self.colour,
            country: self.country,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            available: self.available,
        }
    }
}
