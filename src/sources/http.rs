// Shared HTTP client utilities

use crate::error::IndexError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// User-Agent string for all HTTP requests
const USER_AGENT: &str = concat!("labext-catalog/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client with the crate's User-Agent
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

fn ensure_success(response: Response, url: &str) -> Result<Response, IndexError> {
    if !response.status().is_success() {
        return Err(IndexError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    Ok(response)
}

/// Fetch JSON from a URL and deserialize it
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, IndexError> {
    let response = client.get(url).send().await?;
    let body = ensure_success(response, url)?.bytes().await?;

    serde_json::from_slice(&body).map_err(|source| IndexError::Decode {
        url: url.to_string(),
        source,
    })
}

/// POST an XML document and return the response body
pub async fn post_xml(client: &Client, url: &str, body: String) -> Result<String, IndexError> {
    let response = client
        .post(url)
        .header(CONTENT_TYPE, "text/xml")
        .body(body)
        .send()
        .await?;

    Ok(ensure_success(response, url)?.text().await?)
}
