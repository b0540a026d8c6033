//! Error types for the episodego service.

use episodego_search::SearchError;

/// Top-level error type for the search service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration file could not be read, parsed or written.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search core error (invalid search configuration, client setup).
    #[error("search error: {0}")]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
