// Catalog builder for prebuilt JupyterLab extensions

use crate::constants;
use crate::sources::{Candidate, DownloadStats, PackageIndex, PackageMetadata};
use crate::throttle;
use crate::version;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const CLASSIFIERS: &[&str] = &[constants::PREBUILT_CLASSIFIER];

/// One catalog entry, shaped the way the extension manager expects a
/// prebuilt extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub name: String,
    pub description: Option<String>,
    pub homepage_url: Option<String>,
    pub author: Option<String>,
    pub license: Option<String>,
    pub latest_version: String,
    pub pkg_type: String,
    pub bug_tracker_url: Option<String>,
    pub documentation_url: Option<String>,
    pub package_manager_url: Option<String>,
    pub repository_url: Option<String>,
    pub monthly_download: u64,
}

/// Links shown for an extension, resolved from its metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayUrls {
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub documentation: Option<String>,
    pub bug_tracker: Option<String>,
    pub package_manager: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl DisplayUrls {
    pub fn from_metadata(data: &PackageMetadata) -> Self {
        let repository = non_empty(data.project_link("Source Code"));
        let homepage = non_empty(data.project_link("Homepage"))
            .or_else(|| non_empty(data.home_page.as_deref()));
        let documentation = non_empty(data.docs_url.as_deref())
            .or_else(|| non_empty(data.project_link("Documentation")));
        let bug_tracker = non_empty(data.bugtrack_url.as_deref())
            .or_else(|| non_empty(data.project_link("Bug Tracker")));
        let package_manager = non_empty(data.package_url.as_deref());

        let best_guess_home = homepage
            .or_else(|| non_empty(data.project_url.as_deref()))
            .or(package_manager)
            .or(documentation)
            .or(repository);

        Self {
            homepage: best_guess_home.map(str::to_string),
            repository: repository.map(str::to_string),
            documentation: documentation.map(str::to_string),
            bug_tracker: bug_tracker.map(str::to_string),
            package_manager: package_manager.map(str::to_string),
        }
    }
}

/// Normalize an extension name: drop npm scope markers and use dashes.
///
/// `"@scope/pkg_name"` becomes `"scope-pkg-name"`.
pub fn normalize_name(name: &str) -> String {
    name.replace('@', "").replace(['/', '_'], "-")
}

/// Keep the last version listed for each raw name, in first-seen name order.
pub fn latest_versions(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut latest: Vec<Candidate> = Vec::new();

    for candidate in candidates {
        match positions.get(&candidate.name) {
            Some(&i) => latest[i].version = candidate.version,
            None => {
                positions.insert(candidate.name.clone(), latest.len());
                latest.push(candidate);
            }
        }
    }

    latest
}

/// Sort records by monthly downloads, least popular first. Ties keep their order.
pub fn sort_by_downloads(records: &mut [ExtensionRecord]) {
    records.sort_by_key(|r| r.monthly_download);
}

pub struct CatalogBuilder {
    index: Arc<dyn PackageIndex>,
    stats: Arc<dyn DownloadStats>,
    rpc_request_throttling: f64,
}

impl CatalogBuilder {
    pub fn new(
        index: Arc<dyn PackageIndex>,
        stats: Arc<dyn DownloadStats>,
        rpc_request_throttling: f64,
    ) -> Self {
        Self {
            index,
            stats,
            rpc_request_throttling,
        }
    }

    /// List the available prebuilt extensions, sorted by monthly downloads.
    ///
    /// Compatibility with any particular JupyterLab version is not checked.
    /// A failure while listing or fetching metadata aborts the whole build;
    /// statistics failures only zero the download count.
    pub async fn list_packages(&self) -> anyhow::Result<Vec<ExtensionRecord>> {
        let candidates = self.all_extensions().await?;
        let groups = latest_versions(candidates);
        info!("Found {} prebuilt extension(s)", groups.len());

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut records: Vec<ExtensionRecord> = Vec::with_capacity(groups.len());

        for candidate in groups {
            let record = self.build_record(&candidate).await?;

            match positions.get(&record.name) {
                Some(&i) => {
                    warn!(
                        "'{}' normalizes to '{}' which is already listed; keeping the later entry",
                        candidate.name, record.name
                    );
                    records[i] = record;
                }
                None => {
                    positions.insert(record.name.clone(), records.len());
                    records.push(record);
                }
            }
        }

        sort_by_downloads(&mut records);
        Ok(records)
    }

    async fn all_extensions(&self) -> anyhow::Result<Vec<Candidate>> {
        debug!("Requesting PyPI RPC API for prebuilt JupyterLab extensions.");
        let candidates = throttle::throttle_request(self.rpc_request_throttling, || {
            self.index.browse(CLASSIFIERS)
        })
        .await?;
        Ok(candidates)
    }

    async fn build_record(&self, candidate: &Candidate) -> anyhow::Result<ExtensionRecord> {
        let data = self
            .index
            .package_metadata(&candidate.name, &candidate.version)
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to fetch metadata for '{}' version '{}': {}",
                    candidate.name,
                    candidate.version,
                    e
                )
            })?;

        let urls = DisplayUrls::from_metadata(&data);
        let monthly_download = self.monthly_downloads(&candidate.name).await;

        Ok(ExtensionRecord {
            name: normalize_name(&candidate.name),
            description: data.summary,
            homepage_url: urls.homepage,
            author: data.author,
            license: data.license,
            latest_version: version::to_semver(&candidate.version),
            pkg_type: constants::PKG_TYPE.to_string(),
            bug_tracker_url: urls.bug_tracker,
            documentation_url: urls.documentation,
            package_manager_url: urls.package_manager,
            repository_url: urls.repository,
            monthly_download,
        })
    }

    async fn monthly_downloads(&self, name: &str) -> u64 {
        match self.stats.monthly_downloads(name).await {
            Ok(count) => count,
            Err(e) => {
                debug!("Failed to get PyPI statistics for package '{}': {}", name, e);
                0
            }
        }
    }
}
