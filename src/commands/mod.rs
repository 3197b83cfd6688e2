// Command implementations

pub mod build;
pub mod list;

use crate::catalog::{CatalogBuilder, ExtensionRecord};
use crate::config::Config;
use crate::sources::{PyPiIndex, PyPiStats, http};
use crate::ui;
use anyhow::Context;
use log::debug;
use std::sync::Arc;

/// Wire the PyPI clients into a catalog builder
pub fn catalog_builder(config: &Config) -> anyhow::Result<CatalogBuilder> {
    let client =
        http::build_client(config.request_timeout()).context("Failed to create HTTP client")?;

    debug!("Extensions list will be fetched from {}.", config.base_url);

    let index = PyPiIndex::new(client.clone(), config.base_url.clone());
    let stats = PyPiStats::new(client, config.stats_url.clone());
    Ok(CatalogBuilder::new(
        Arc::new(index),
        Arc::new(stats),
        config.rpc_request_throttling,
    ))
}

/// Build the catalog behind a spinner
pub async fn fetch_catalog(config: &Config) -> anyhow::Result<Vec<ExtensionRecord>> {
    let builder = catalog_builder(config)?;
    let pb = ui::spinner(&format!("Fetching prebuilt extensions from {}", config.base_url));

    match builder.list_packages().await {
        Ok(catalog) => {
            ui::finish_spinner_success(&pb, &format!("Fetched {} extension(s)", catalog.len()));
            Ok(catalog)
        }
        Err(e) => {
            ui::finish_spinner_error(&pb, "Failed to build the catalog");
            Err(e)
        }
    }
}
