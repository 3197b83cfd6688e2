// pypistats.org download statistics

use crate::constants;
use crate::error::StatsError;
use crate::sources::source_trait::DownloadStats;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RecentResponse {
    data: Option<RecentData>,
}

#[derive(Debug, Deserialize)]
struct RecentData {
    last_month: Option<u64>,
}

pub struct PyPiStats {
    client: Client,
    url_template: String,
}

impl PyPiStats {
    /// `url_template` must contain `{package}`
    pub fn new(client: Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    fn recent_url(&self, package: &str) -> String {
        self.url_template.replace(
            constants::STATS_URL_PLACEHOLDER,
            &urlencoding::encode(package),
        )
    }
}

#[async_trait]
impl DownloadStats for PyPiStats {
    async fn monthly_downloads(&self, package: &str) -> Result<u64, StatsError> {
        let url = self.recent_url(package);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(StatsError::Status {
                url,
                status: response.status(),
            });
        }

        let body = response.bytes().await?;
        let recent: RecentResponse = serde_json::from_slice(&body)?;
        recent
            .data
            .and_then(|d| d.last_month)
            .ok_or(StatsError::MissingField)
    }
}
