//! Google results-page scraper.
//!
//! Google's basic HTML results page (served to non-JavaScript clients)
//! wraps each organic result in a `div.kCrYT` block whose anchor points at
//! a `/url?q=<dest>&...` click-through redirect and whose label sits in a
//! `.vvjwJb` element inside the anchor.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::orchestrator::url_repair::{ensure_scheme, has_http_scheme, is_blocked, unwrap_redirect};
use crate::types::Candidate;

/// Builds results-page URLs and parses the pages it gets back.
#[derive(Debug, Clone)]
pub struct GoogleEngine {
    base_url: String,
    per_page: u32,
}

impl GoogleEngine {
    /// Create an engine for `base_url`, requesting `per_page` results.
    pub fn new(base_url: impl Into<String>, per_page: u32) -> Self {
        Self {
            base_url: base_url.into(),
            per_page,
        }
    }

    /// Create an engine from the search configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.search_base_url.clone(), config.results_per_page)
    }

    /// URL of the results page starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the base URL does not parse.
    pub fn results_page_url(&self, query: &str, offset: u32) -> Result<String, SearchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("invalid search_base_url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("oe", "utf8")
            .append_pair("num", &self.per_page.to_string())
            .append_pair("start", &offset.to_string());
        Ok(url.into())
    }
}

/// Parse a Google results page into candidates, in page order.
///
/// Extracted as a separate function for testability with mock HTML.
/// Blocks without an anchor or label are skipped, never fatal.
pub fn parse_results_page(html: &str, blocked: &[String]) -> Vec<Candidate> {
    let (Ok(block_sel), Ok(anchor_sel), Ok(label_sel)) = (
        Selector::parse("div.kCrYT"),
        Selector::parse("a[href]"),
        Selector::parse(".vvjwJb"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    for (index, block) in document.select(&block_sel).enumerate() {
        let Some(anchor) = block.select(&anchor_sel).next() else {
            tracing::debug!(block = index, "result block without anchor skipped");
            continue;
        };
        let Some(label) = anchor.select(&label_sel).next() else {
            tracing::debug!(block = index, "result block without label skipped");
            continue;
        };

        let title = label_text(label);
        if title.is_empty() {
            continue;
        }

        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = destination(href) else {
            tracing::trace!(href, "non-result link skipped");
            continue;
        };
        if is_blocked(&url, blocked) {
            tracing::trace!(url = %url, "blocked destination skipped");
            continue;
        }

        candidates.push(Candidate::new(title, url));
    }

    candidates
}

/// Recover the destination of a result anchor.
fn destination(href: &str) -> Option<String> {
    let href = href.trim();
    match unwrap_redirect(href) {
        Some(dest) if !dest.is_empty() => Some(ensure_scheme(dest)),
        Some(_) => None,
        None if has_http_scheme(href) => Some(href.to_owned()),
        None => None,
    }
}

fn label_text(label: ElementRef<'_>) -> String {
    label.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}
