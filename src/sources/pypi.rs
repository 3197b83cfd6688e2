// PyPI index implementation (XML-RPC listing + JSON metadata)

use crate::error::IndexError;
use crate::sources::http;
use crate::sources::source_trait::{Candidate, PackageIndex, PackageMetadata};
use crate::sources::xmlrpc::{self, MethodResponse, Value};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    info: PackageMetadata,
}

pub struct PyPiIndex {
    client: Client,
    base_url: String,
}

impl PyPiIndex {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn release_url(&self, name: &str, version: &str) -> String {
        format!(
            "{}/{}/{}/json",
            self.base_url,
            urlencoding::encode(name),
            urlencoding::encode(version)
        )
    }
}

/// Convert a `browse` result into candidates
fn candidates_from(value: Value) -> Result<Vec<Candidate>, IndexError> {
    let Value::Array(rows) = value else {
        return Err(IndexError::XmlRpc(
            "browse result is not an array".to_string(),
        ));
    };

    rows.iter()
        .map(|row| match row.as_array() {
            Some([name, version]) => match (name.as_str(), version.as_str()) {
                (Some(name), Some(version)) => Ok(Candidate::new(name, version)),
                _ => Err(IndexError::XmlRpc(format!(
                    "browse row holds non-string values: {:?}",
                    row
                ))),
            },
            _ => Err(IndexError::XmlRpc(format!(
                "browse row is not a [name, version] pair: {:?}",
                row
            ))),
        })
        .collect()
}

#[async_trait]
impl PackageIndex for PyPiIndex {
    async fn browse(&self, classifiers: &[&str]) -> Result<Vec<Candidate>, IndexError> {
        let classifiers = classifiers
            .iter()
            .map(|c| Value::String(c.to_string()))
            .collect();
        let body = xmlrpc::method_call("browse", &[Value::Array(classifiers)]);

        debug!("POST {} browse", self.base_url);
        let text = http::post_xml(&self.client, &self.base_url, body).await?;

        match xmlrpc::parse_response(&text).map_err(IndexError::XmlRpc)? {
            MethodResponse::Fault { code, message } => Err(IndexError::Fault { code, message }),
            MethodResponse::Success(value) => candidates_from(value),
        }
    }

    async fn package_metadata(
        &self,
        name: &str,
        version: &str,
    ) -> Result<PackageMetadata, IndexError> {
        let url = self.release_url(name, version);
        debug!("GET {}", url);
        let release: ReleaseResponse = http::fetch_json(&self.client, &url).await?;
        Ok(release.info)
    }
}
