//! Keyword-weight scoring for candidates.
//!
//! A text blob scores the sum of every [`WeightModel`] rule that fires on
//! it plus a bonus per distinct query token it contains. A candidate's
//! composite score combines up to four independently toggled sources:
//!
//! - its result title,
//! - its fetched page (title and visible body text),
//! - a flat reference-domain bonus,
//! - a damped sum over a few pages linked from the candidate page.
//!
//! Fetch failures while scoring never fail the search; the affected source
//! contributes zero.

use futures::future::join_all;

use crate::cache::PageCache;
use crate::config::ScoringConfig;
use crate::content::{extract_content, outbound_links};
use crate::fetcher::PageFetcher;
use crate::orchestrator::weights::WeightModel;
use crate::types::Candidate;

/// Lowercased, de-duplicated whitespace tokens of `query`, in order.
pub fn query_tokens(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in query.split_whitespace().map(str::to_lowercase) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Score one text blob.
///
/// Every rule of `model` that fires adds its weight once; every distinct
/// query token occurring in the text adds `token_bonus`. Matching is
/// case-insensitive substring containment.
///
/// ```
/// use episodego_search::orchestrator::scoring::text_score;
/// use episodego_search::orchestrator::weights::{WeightModel, WeightRule};
///
/// let model = WeightModel::new(vec![
///     WeightRule::new(["friends"], 3.0),
///     WeightRule::new(["movie"], -3.0),
/// ]);
/// assert_eq!(text_score("Friends (TV)", "friends", &model, 1.0), 4.0);
/// assert_eq!(text_score("Friends the Movie", "friends", &model, 1.0), 1.0);
/// ```
pub fn text_score(text: &str, query: &str, model: &WeightModel, token_bonus: f64) -> f64 {
    score_tokens(text, &query_tokens(query), model, token_bonus)
}

fn score_tokens(text: &str, tokens: &[String], model: &WeightModel, token_bonus: f64) -> f64 {
    let lowered = text.to_lowercase();
    let hits = tokens
        .iter()
        .filter(|token| lowered.contains(token.as_str()))
        .count();
    model.score_lowered(&lowered) + hits as f64 * token_bonus
}

/// Per-source contributions to a candidate's score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    /// Title and page-body text scores.
    pub main: f64,
    /// Reference-domain bonus.
    pub domain_bonus: f64,
    /// Damped sum of secondary-page scores.
    pub secondary: f64,
}

impl ScoreBreakdown {
    /// The composite score.
    pub fn total(&self) -> f64 {
        self.main + self.domain_bonus + self.secondary
    }
}

/// Scores candidates of one search.
///
/// Holds the per-search [`PageCache`], so a page linked from several
/// candidates is fetched once.
pub struct Scorer<'a, F> {
    fetcher: &'a F,
    config: &'a ScoringConfig,
    blocked: &'a [String],
    pages: PageCache,
}

impl<'a, F: PageFetcher> Scorer<'a, F> {
    /// Create a scorer with an empty page cache.
    pub fn new(fetcher: &'a F, config: &'a ScoringConfig, blocked: &'a [String]) -> Self {
        Self {
            fetcher,
            config,
            blocked,
            pages: PageCache::new(),
        }
    }

    /// Score `candidate` against the caller's `query`.
    pub async fn score(&self, candidate: &Candidate, query: &str) -> ScoreBreakdown {
        let tokens = query_tokens(query);
        let mut breakdown = ScoreBreakdown::default();

        if self.config.title {
            breakdown.main += self.text_score(&candidate.title, &tokens);
        }

        if let Some(bonus) = &self.config.domain_bonus {
            if candidate
                .url
                .to_lowercase()
                .contains(&bonus.marker.to_lowercase())
            {
                breakdown.domain_bonus = bonus.bonus;
            }
        }

        if self.config.needs_candidate_page() {
            match self.pages.get_or_fetch(self.fetcher, &candidate.url).await {
                Some(body) => {
                    if self.config.page_body {
                        breakdown.main += self.page_score(&body, &candidate.url, &tokens);
                    }
                    if let Some(secondary) = &self.config.secondary {
                        let links = outbound_links(
                            &body,
                            &candidate.url,
                            self.blocked,
                            secondary.max_links,
                        );
                        breakdown.secondary =
                            self.secondary_sum(&links, &tokens).await * secondary.damping;
                    }
                }
                None => {
                    tracing::debug!(url = %candidate.url, "candidate page unavailable, scoring without it");
                }
            }
        }

        tracing::debug!(
            title = %candidate.title,
            main = breakdown.main,
            domain_bonus = breakdown.domain_bonus,
            secondary = breakdown.secondary,
            total = breakdown.total(),
            "candidate scored"
        );
        breakdown
    }

    fn text_score(&self, text: &str, tokens: &[String]) -> f64 {
        score_tokens(
            text,
            tokens,
            &self.config.weights,
            self.config.query_token_bonus,
        )
    }

    /// Score of a fetched page's title and visible text; zero if it has none.
    fn page_score(&self, html: &str, url: &str, tokens: &[String]) -> f64 {
        match extract_content(html, url) {
            Ok(page) => self.text_score(&page.scoring_text(), tokens),
            Err(err) => {
                tracing::debug!(url, error = %err, "page has no scorable content");
                0.0
            }
        }
    }

    /// Undamped sum of the secondary pages' scores, fetched concurrently.
    async fn secondary_sum(&self, links: &[String], tokens: &[String]) -> f64 {
        let scores = join_all(links.iter().map(|link| async move {
            match self.pages.get_or_fetch(self.fetcher, link).await {
                Some(body) => self.page_score(&body, link, tokens),
                None => 0.0,
            }
        }))
        .await;
        scores.into_iter().sum()
    }
}
