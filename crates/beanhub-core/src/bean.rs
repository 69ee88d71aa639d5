use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::SelectionDate;

/// A catalog item. The store assigns `id` on creation and it is immutable
/// afterwards; every other field is replaceable through update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeBean {
    pub id: i64,
    pub name: String,
    pub colour: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub price: BigDecimal,
    pub image_url: String,
    pub available: bool,
}

impl CoffeeBean {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        colour: impl Into<String>,
        country: impl Into<String>,
        price: BigDecimal,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            colour: colour.into(),
            country: country.into(),
            description: None,
            price,
            image_url: image_url.into(),
            available: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Case-insensitive substring match against name, country, or colour.
    /// A hit on any one field qualifies.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.country.to_lowercase().contains(&needle)
            || self.colour.to_lowercase().contains(&needle)
    }
}

/// The record binding one calendar date to one catalog item.
///
/// At most one of these exists per date; rows are written once and kept as
/// history so the next day's selection can see yesterday's pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySelection {
    pub id: i64,
    pub bean_id: i64,
    pub date: SelectionDate,
}

impl DailySelection {
    pub fn new(id: i64, bean_id: i64, date: SelectionDate) -> Self {
        Self { id, bean_id, date }
    }
}
