// Error kinds for upstream index calls

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Fault code PyPI uses for XML-RPC rate limiting.
pub const RATE_LIMIT_FAULT_CODE: i64 = -32500;
const RATE_LIMIT_PREFIX: &str = "HTTPTooManyRequests:";

/// Delay hint used when the fault message carries none.
pub const DEFAULT_RATE_LIMIT_DELAY: f64 = 1.01;

lazy_static! {
    static ref RESET_HINT: Regex = Regex::new(r"Limit may reset in (\d+) seconds\.")
        .expect("rate limit pattern is valid");
}

/// Failure of a listing or metadata call. These abort a catalog build.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("XML-RPC fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request failed: {url} ({status})")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed XML-RPC payload: {0}")]
    XmlRpc(String),
}

impl IndexError {
    /// Returns the server's reset hint in seconds when this is a rate-limit fault.
    pub fn rate_limit_delay(&self) -> Option<f64> {
        match self {
            IndexError::Fault { code, message }
                if *code == RATE_LIMIT_FAULT_CODE && message.starts_with(RATE_LIMIT_PREFIX) =>
            {
                let delay = RESET_HINT
                    .captures(message)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse::<u64>().ok())
                    .map(|secs| secs as f64)
                    .unwrap_or(DEFAULT_RATE_LIMIT_DELAY);
                Some(delay)
            }
            _ => None,
        }
    }
}

/// Failure of a download statistics lookup. Never fatal.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request failed: {url} ({status})")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Invalid statistics payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Statistics payload has no data.last_month")]
    MissingField,
}
