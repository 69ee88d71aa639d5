//! Seed import for first startup.
//!
//! A small catalog ships inside the binary; an alternative JSON file can be
//! pointed at via `seed.path`. The import runs only when storage holds no
//! items at all, so restarts never duplicate data.

use std::str::FromStr;

use anyhow::Context;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use tracing::{info, warn};

use beanhub_storage::{CatalogStore, NewBean};

use crate::config::SeedConfig;

static BUNDLED_CATALOG: &str = include_str!("../seed/coffee_beans.json");

/// One record of the seed file. Field names follow the source data's
/// casing; unrelated fields such as `index` and `isBOTD` are ignored.
#[derive(Debug, Deserialize)]
struct SeedRecord {
    #[serde(rename = "Name")]
    name: String,
    colour: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Cost")]
    cost: String,
}

/// Outcome of one seed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub inserted: usize,
    pub skipped: usize,
}

/// Imports the seed catalog unless storage already holds data.
///
/// Records whose cost does not parse are skipped with a warning rather
/// than failing the whole import.
pub async fn run(catalog: &dyn CatalogStore, config: &SeedConfig) -> anyhow::Result<SeedStats> {
    if !config.enabled {
        return Ok(SeedStats::default());
    }

    // An empty keyword matches every row, availability included, so this
    // doubles as the "is there anything at all" probe.
    if !catalog.search("").await?.is_empty() {
        info!("Catalog already holds data, skipping seed import");
        return Ok(SeedStats::default());
    }

    let json = match &config.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file '{path}'"))?,
        None => BUNDLED_CATALOG.to_string(),
    };

    let records: Vec<SeedRecord> =
        serde_json::from_str(&json).context("failed to parse seed data")?;

    let mut stats = SeedStats::default();
    for record in records {
        let Some(price) = parse_cost(&record.cost) else {
            warn!(name = %record.name, cost = %record.cost, "Skipping seed record with unparseable cost");
            stats.skipped += 1;
            continue;
        };

        let mut bean = NewBean::new(record.name, record.colour, record.country, price, record.image);
        if !record.description.trim().is_empty() {
            bean = bean.with_description(record.description);
        }

        catalog.add(bean).await?;
        stats.inserted += 1;
    }

    info!(
        inserted = stats.inserted,
        skipped = stats.skipped,
        "Seed import finished"
    );
    Ok(stats)
}

/// Parses a seed cost such as `£18.25` into a decimal price.
fn parse_cost(cost: &str) -> Option<BigDecimal> {
    let cleaned = cost.trim().trim_start_matches('£').trim();
    BigDecimal::from_str(cleaned).ok()
}
