//! Shared HTTP client with User-Agent rotation.
//!
//! [`HttpFetcher`] is the production [`PageFetcher`]: one pooled
//! [`reqwest::Client`] with cookie support and a fixed timeout, sending a
//! browser-like identity and no-cache headers on every request.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::header::{CACHE_CONTROL, PRAGMA, USER_AGENT};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::fetcher::PageFetcher;

/// Realistic browser User-Agent strings, rotated per request.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

/// Build a [`reqwest::Client`] for fetching results and candidate pages.
///
/// The client has a cookie store (for consent pages), the configured
/// timeout covering connect and read, at most 10 redirects, and brotli
/// and gzip decompression.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is a non-empty const array
        .unwrap_or(USER_AGENTS[0])
}

/// [`PageFetcher`] backed by a real HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: Option<String>,
}

impl HttpFetcher {
    /// Build a fetcher from the search configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: build_client(config)?,
            user_agent: config.user_agent.clone(),
        })
    }

    fn user_agent(&self) -> &str {
        match self.user_agent.as_deref() {
            Some(custom) => custom,
            None => random_user_agent(),
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SearchError> {
        tracing::trace!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent())
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify)?;
        tracing::trace!(url, bytes = body.len(), "page received");
        Ok(body)
    }
}

/// Map a transport error without the request URL, which carries the query.
fn classify(err: reqwest::Error) -> SearchError {
    let err = err.without_url();
    if err.is_timeout() {
        SearchError::Timeout(err.to_string())
    } else if let Some(status) = err.status() {
        SearchError::Status {
            status: status.as_u16(),
        }
    } else {
        SearchError::Http(err.to_string())
    }
}
