//! Error types for the episodego-search crate.
//!
//! Messages are stable strings suitable for logs and for programmatic
//! matching. Query text never appears in an error message.

/// Errors that can occur while searching, fetching or configuring.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A transport-level failure (connect, TLS, body read, bad URL).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status code.
    #[error("HTTP status {status}")]
    Status {
        /// The numeric status code returned.
        status: u16,
    },

    /// A fetch did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A page could not be turned into usable content.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The caller supplied an unusable query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Convenience type alias for episodego-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_status() {
        let err = SearchError::Status { status: 429 };
        assert_eq!(err.to_string(), "HTTP status 429");
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("exceeded 5s limit".into());
        assert_eq!(err.to_string(), "request timed out: exceeded 5s limit");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("capacity must be greater than 0".into());
        assert_eq!(err.to_string(), "config error: capacity must be greater than 0");
    }

    #[test]
    fn display_invalid_query() {
        let err = SearchError::InvalidQuery("query is empty".into());
        assert_eq!(err.to_string(), "invalid query: query is empty");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
