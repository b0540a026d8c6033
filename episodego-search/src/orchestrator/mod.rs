//! Search orchestrator: extraction, scoring, ranking and selection.
//!
//! This module turns results pages into candidates keyed by title, repairs
//! their destinations, scores them with the keyword-weight model and cuts
//! the ranked list down under a per-domain quota and a relevance gate.

pub mod candidates;
pub mod scoring;
pub mod search;
pub mod selection;
pub mod url_repair;
pub mod weights;
