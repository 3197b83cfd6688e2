// Trait definitions for the upstream package index and statistics service

use crate::error::{IndexError, StatsError};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A `(name, version)` pair returned by the bulk listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub version: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// The subset of a release's `info` object kept for catalog entries.
/// Every other key of the upstream payload is dropped on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageMetadata {
    pub author: Option<String>,
    pub bugtrack_url: Option<String>,
    pub docs_url: Option<String>,
    pub home_page: Option<String>,
    pub license: Option<String>,
    pub package_url: Option<String>,
    pub project_url: Option<String>,
    pub project_urls: Option<BTreeMap<String, String>>,
    pub summary: Option<String>,
}

impl PackageMetadata {
    /// Look up a labelled project URL (e.g. "Source Code")
    pub fn project_link(&self, label: &str) -> Option<&str> {
        self.project_urls
            .as_ref()
            .and_then(|urls| urls.get(label))
            .map(String::as_str)
    }
}

/// Trait for package indexes (PyPI or a compatible mirror)
#[async_trait::async_trait]
pub trait PackageIndex: Send + Sync {
    /// List every `(name, version)` release carrying all of `classifiers`
    async fn browse(&self, classifiers: &[&str]) -> Result<Vec<Candidate>, IndexError>;

    /// Fetch metadata for one release
    async fn package_metadata(
        &self,
        name: &str,
        version: &str,
    ) -> Result<PackageMetadata, IndexError>;
}

/// Trait for download statistics services
#[async_trait::async_trait]
pub trait DownloadStats: Send + Sync {
    /// Downloads over the last month for a raw package name
    async fn monthly_downloads(&self, package: &str) -> Result<u64, StatsError>;
}
