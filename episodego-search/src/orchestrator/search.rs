//! Core search orchestrator: fetch, extract, score, select.
//!
//! Fetches every configured results page, merges their candidates by
//! title, drops malformed destinations, scores the survivors with a
//! bounded number of fetches in flight, and cuts the ranked list down to
//! the final answer.

use futures::stream::{self, StreamExt};

use crate::config::SearchConfig;
use crate::engines::google::{parse_results_page, GoogleEngine};
use crate::error::SearchError;
use crate::fetcher::PageFetcher;
use crate::types::{Candidate, RankedResults, ScoredCandidate};

use super::candidates::CandidateSet;
use super::scoring::Scorer;
use super::selection::select;
use super::url_repair::repair_destination;

/// Run one search through `fetcher`.
///
/// # Pipeline
///
/// 1. Reject a blank query
/// 2. Prefix the topic term for the outbound query
/// 3. Fetch each results page in offset order and merge candidates by title
/// 4. Repair and validate destination URLs
/// 5. Score candidates against the caller's query, `max_concurrent_fetches`
///    at a time
/// 6. Rank, apply the quota and capacity, apply the relevance gate
///
/// # Errors
///
/// Returns [`SearchError::InvalidQuery`] for a blank query and propagates
/// any failure fetching a results page. Failures while scoring never
/// surface here.
pub async fn orchestrate_search<F: PageFetcher>(
    query: &str,
    config: &SearchConfig,
    fetcher: &F,
) -> Result<RankedResults, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::InvalidQuery("query must not be empty".into()));
    }

    let outbound = config.outbound_query(query);
    tracing::trace!(query, outbound = %outbound, "starting search");

    // 1. Results pages, sequentially; any failure is fatal.
    let engine = GoogleEngine::from_config(config);
    let mut candidates = CandidateSet::new();
    for &offset in &config.result_offsets {
        let url = engine.results_page_url(&outbound, offset)?;
        let html = fetcher.fetch(&url).await?;
        let page = parse_results_page(&html, &config.blocked_domains);
        tracing::debug!(offset, count = page.len(), "results page extracted");
        candidates.merge(page);
    }

    // 2. Destination repair.
    let candidates = if config.validate_urls {
        repair_candidates(candidates.into_candidates())
    } else {
        candidates.into_candidates()
    };
    tracing::debug!(count = candidates.len(), "candidates to score");

    // 3. Scoring, order preserved.
    let scorer = Scorer::new(fetcher, &config.scoring, &config.blocked_domains);
    let scored: Vec<ScoredCandidate> = stream::iter(candidates)
        .map(|candidate| {
            let scorer = &scorer;
            async move {
                let score = scorer.score(&candidate, query).await.total();
                ScoredCandidate::new(candidate, score)
            }
        })
        .buffered(config.max_concurrent_fetches.max(1))
        .collect()
        .await;

    // 4. Selection.
    let selected = select(scored, &config.selection);
    tracing::debug!(count = selected.len(), "search complete");
    Ok(RankedResults::from(selected))
}

/// Replace each destination with its repaired form, dropping the ones that
/// stay malformed.
fn repair_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter_map(|candidate| match repair_destination(&candidate.url) {
            Some(url) => Some(Candidate::new(candidate.title, url)),
            None => {
                tracing::debug!(url = %candidate.url, "malformed destination dropped");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScoringConfig, SelectionConfig};
    use crate::error::Result;
    use crate::orchestrator::weights::{WeightModel, WeightRule};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned results pages keyed by `start=` offset and records
    /// every requested URL. Any other URL fails.
    struct FixtureFetcher {
        results: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FixtureFetcher {
        fn new() -> Self {
            Self {
                results: HashMap::new(),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn results_page(mut self, offset: u32, entries: &[(&str, &str)]) -> Self {
            let blocks: String = entries
                .iter()
                .map(|(title, url)| {
                    format!(
                        r#"<div class="kCrYT"><a href="/url?q={url}&amp;sa=U"><div class="vvjwJb">{title}</div></a></div>"#
                    )
                })
                .collect();
            self.results
                .insert(format!("start={offset}"), format!("<html><body>{blocks}</body></html>"));
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    impl PageFetcher for FixtureFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            if let Ok(mut requested) = self.requested.lock() {
                requested.push(url.to_owned());
            }
            self.results
                .iter()
                .find(|(key, _)| url.ends_with(key.as_str()))
                .map(|(_, body)| body.clone())
                .ok_or(SearchError::Status { status: 503 })
        }
    }

    fn config() -> SearchConfig {
        SearchConfig {
            search_base_url: "https://search.test/search".into(),
            scoring: ScoringConfig {
                weights: WeightModel::new(vec![
                    WeightRule::new(["friends"], 3.0),
                    WeightRule::new(["movie"], -3.0),
                ]),
                secondary: None,
                ..Default::default()
            },
            selection: SelectionConfig {
                relevance_floor: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn blank_query_rejected() {
        let fetcher = FixtureFetcher::new();
        let err = orchestrate_search("   ", &config(), &fetcher).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn outbound_query_carries_topic_prefix() {
        let fetcher = FixtureFetcher::new()
            .results_page(0, &[])
            .results_page(50, &[]);
        orchestrate_search("central perk", &config(), &fetcher)
            .await
            .expect("search succeeds");
        let requested = fetcher.requested();
        assert_eq!(requested.len(), 2);
        assert!(requested[0].contains("q=Friends+central+perk"));
        assert!(requested[0].ends_with("start=0"));
        assert!(requested[1].ends_with("start=50"));
    }

    #[tokio::test]
    async fn primary_failure_fails_search() {
        let fetcher = FixtureFetcher::new().results_page(0, &[("Friends", "https://a.example/")]);
        let err = orchestrate_search("friends", &config(), &fetcher)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP status 503");
    }

    #[tokio::test]
    async fn ranks_and_collapses_across_pages() {
        let fetcher = FixtureFetcher::new()
            .results_page(
                0,
                &[
                    ("Friends the Movie", "https://movies.example/friends"),
                    ("Friends (TV)", "https://tv.example/old"),
                ],
            )
            .results_page(50, &[("Friends (TV)", "https://en.wikipedia.org/wiki/Friends")]);
        let results = orchestrate_search("friends", &config(), &fetcher)
            .await
            .expect("search succeeds");
        assert_eq!(results.titles(), vec!["Friends (TV)", "Friends the Movie"]);
        assert_eq!(
            results.get("Friends (TV)"),
            Some("https://en.wikipedia.org/wiki/Friends")
        );
    }

    #[tokio::test]
    async fn scoring_ignores_topic_prefix() {
        // The prefix "Friends" must not earn a token bonus on its own.
        let mut cfg = config();
        cfg.scoring.weights = WeightModel::new(vec![]);
        cfg.selection.relevance_floor = 0.5;
        let fetcher = FixtureFetcher::new()
            .results_page(0, &[("Friends trivia", "https://a.example/")])
            .results_page(50, &[]);
        let results = orchestrate_search("gunther", &cfg, &fetcher)
            .await
            .expect("search succeeds");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn malformed_destinations_dropped_when_validating() {
        let fetcher = FixtureFetcher::new()
            .results_page(
                0,
                &[
                    ("Friends ok", "https://ok.example/friends"),
                    ("Friends bad", "https://bad host.example/"),
                    ("Friends encoded", "https://enc.example/a%2520b"),
                ],
            )
            .results_page(50, &[]);
        let results = orchestrate_search("x", &config(), &fetcher)
            .await
            .expect("search succeeds");
        assert_eq!(results.len(), 2);
        assert!(results.get("Friends bad").is_none());
        assert_eq!(results.get("Friends encoded"), Some("https://enc.example/a%20b"));

        let lenient = SearchConfig {
            validate_urls: false,
            ..config()
        };
        let results = orchestrate_search("x", &lenient, &fetcher)
            .await
            .expect("search succeeds");
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn relevance_gate_empties_results() {
        let mut cfg = config();
        cfg.selection.relevance_floor = 10.0;
        let fetcher = FixtureFetcher::new()
            .results_page(0, &[("Friends", "https://a.example/")])
            .results_page(50, &[]);
        let results = orchestrate_search("friends", &cfg, &fetcher)
            .await
            .expect("search succeeds");
        assert!(results.is_empty());
    }
}
