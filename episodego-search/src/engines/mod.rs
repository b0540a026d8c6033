//! Search engine implementations.
//!
//! Each module builds the results-page URLs for one engine and scrapes the
//! pages it returns into [`crate::types::Candidate`]s.

pub mod google;

pub use google::GoogleEngine;
