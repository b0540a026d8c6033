//! Trait definition for the page-fetching transport.
//!
//! The search pipeline never talks to the network directly. Results pages,
//! candidate pages and secondary pages all go through a [`PageFetcher`],
//! which production code satisfies with [`crate::http::HttpFetcher`] and
//! tests satisfy with in-memory fixtures.

use crate::error::SearchError;

/// Fetches the raw text of a page.
///
/// Implementations make exactly one attempt per call (no retries) and must
/// report non-success statuses and transport failures as errors, so that
/// callers can tell them apart from a successful, possibly empty, body.
///
/// All implementations must be `Send + Sync` so candidates can be scored
/// concurrently.
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Status`] for a non-success status,
    /// [`SearchError::Timeout`] when the configured timeout elapses, and
    /// [`SearchError::Http`] for any other transport failure.
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, SearchError>> + Send;
}

impl<F: PageFetcher> PageFetcher for &F {
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, SearchError>> + Send {
        (**self).fetch(url)
    }
}

impl<F: PageFetcher> PageFetcher for std::sync::Arc<F> {
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, SearchError>> + Send {
        (**self).fetch(url)
    }
}
