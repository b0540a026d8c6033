//! # episodego-search
//!
//! Topic-biased web search for the sitcom *Friends*.
//!
//! A free-text query is sent to Google with a topical prefix, the organic
//! results are scraped into `title → url` candidates, every candidate is
//! scored against a bilingual keyword-weight model, and a bounded,
//! quota-balanced list comes back in ranked order.
//!
//! ## Design
//!
//! - Results pages are scraped with CSS selectors; no API keys
//! - Scoring strategies (title, page body, domain bonus, secondary pages)
//!   are toggled independently in [`config::ScoringConfig`]
//! - The weight table is data, replaceable from configuration
//! - Ties in score keep extraction order, so ranking is deterministic
//! - Every page is fetched at most once per search
//!
//! ## Failure model
//!
//! - A failed results-page fetch fails the whole search
//! - A failed candidate or secondary page only zeroes that contribution
//! - Queries are logged at trace level only

pub mod cache;
pub mod config;
pub mod content;
pub mod engines;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod orchestrator;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use fetcher::PageFetcher;
pub use http::HttpFetcher;
pub use types::{Candidate, PageContent, RankedResults, ScoredCandidate};

/// Search the web over HTTP.
///
/// Validates `config`, builds an [`HttpFetcher`] from it and runs the full
/// pipeline.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration,
/// [`SearchError::InvalidQuery`] for a blank query, and the transport
/// error of any results page that could not be fetched.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> episodego_search::Result<()> {
/// let config = episodego_search::SearchConfig::default();
/// let results = episodego_search::search("central perk", &config).await?;
/// for (title, url) in results.iter() {
///     println!("{title}: {url}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<RankedResults> {
    config.validate()?;
    let fetcher = HttpFetcher::new(config)?;
    orchestrator::search::orchestrate_search(query, config, &fetcher).await
}

/// Search through a caller-supplied fetcher.
///
/// Lets long-running services share one [`HttpFetcher`] across requests
/// and lets tests run the pipeline offline.
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_with<F: PageFetcher>(
    fetcher: &F,
    query: &str,
    config: &SearchConfig,
) -> Result<RankedResults> {
    config.validate()?;
    orchestrator::search::orchestrate_search(query, config, fetcher).await
}

/// Fetch a page and extract its title and visible text.
///
/// # Errors
///
/// Returns the fetch error if the page cannot be retrieved, or
/// [`SearchError::Parse`] if it has no extractable content.
pub async fn fetch_page_content<F: PageFetcher>(fetcher: &F, url: &str) -> Result<PageContent> {
    let html = fetcher.fetch(url).await?;
    content::extract_content(&html, url)
}
