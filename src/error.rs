//! Typed errors for the article collector and configuration loading.
//!
//! The collector works in two tiers. A search-page [`FetchError`] stops the
//! whole run, while an article-page [`FetchError`] is swapped for sentinel
//! content and the run continues. Neither tier ever reaches the caller of
//! [`collect`](crate::scrapers::enterprise::collect).
//!
//! Everything above the collector (LLM calls, CLI plumbing) propagates
//! `Box<dyn Error>`.

use thiserror::Error;

/// Failure to retrieve an HTML page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level fault: connection refused, DNS failure, timeout, or a
    /// body that could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The URL could not be parsed.
    #[error("invalid url {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// The URL the failed request was aimed at.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. } => url,
            FetchError::Status { url, .. } => url,
            FetchError::InvalidUrl(url) => url,
        }
    }
}

/// Failure to load or validate the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
