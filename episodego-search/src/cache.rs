//! Per-search page cache.
//!
//! Candidates on the same site often link to the same secondary pages,
//! and page-body scoring and link discovery both need the candidate page.
//! [`PageCache`] makes sure every URL is fetched at most once per search:
//! concurrent lookups for one URL share a single in-flight fetch, and a
//! failed fetch is remembered as "no content" instead of being retried.
//!
//! A cache lives for one search only, so nothing persists across queries.

use std::sync::Arc;

use moka::future::Cache;

use crate::fetcher::PageFetcher;

/// Upper bound on distinct pages held by one search.
const MAX_PAGES_PER_SEARCH: u64 = 1_024;

/// Fetch-once page store keyed by URL.
#[derive(Clone)]
pub struct PageCache {
    pages: Cache<String, Option<Arc<str>>>,
}

impl PageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            pages: Cache::builder().max_capacity(MAX_PAGES_PER_SEARCH).build(),
        }
    }

    /// Return the body of `url`, fetching it on first use.
    ///
    /// Returns `None` if the fetch failed; the failure is logged once.
    pub async fn get_or_fetch<F: PageFetcher>(&self, fetcher: &F, url: &str) -> Option<Arc<str>> {
        self.pages
            .get_with(url.to_owned(), async {
                match fetcher.fetch(url).await {
                    Ok(body) => Some(Arc::from(body)),
                    Err(err) => {
                        tracing::debug!(url, error = %err, "page fetch failed");
                        None
                    }
                }
            })
            .await
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}
