//! episodego: a web search service biased toward the sitcom *Friends*.
//!
//! The ranking pipeline lives in the `episodego-search` crate; this crate
//! wraps it in configuration loading and a small HTTP API.
//!
//! # Architecture
//!
//! - **Config**: TOML file with host, port and every search setting
//! - **Server**: `axum` router exposing `/api/search` and `/health`
//! - **Search**: fetch results pages, score candidates, select the answer

pub mod config;
pub mod error;
pub mod server;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use server::{AppState, build_router, run_server};
