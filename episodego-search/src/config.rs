//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the outbound search request, the scoring
//! strategies and the selection quota. Every field has a default, so a
//! partial TOML table deserialises into a complete configuration.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::orchestrator::weights::WeightModel;

/// Configuration for a search operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Topical term prepended to every outbound query. Scoring always uses
    /// the caller's query without this prefix.
    pub topic_prefix: Option<String>,
    /// Results endpoint of the search engine.
    pub search_base_url: String,
    /// Result offsets to fetch, one results page per offset.
    pub result_offsets: Vec<u32>,
    /// Results requested per page (`num=` parameter).
    pub results_per_page: u32,
    /// Per-request timeout in seconds, covering connect and read.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list.
    pub user_agent: Option<String>,
    /// URL substrings that exclude a result or a secondary link.
    pub blocked_domains: Vec<String>,
    /// Drop candidates whose destination URL is malformed after repair.
    pub validate_urls: bool,
    /// Maximum number of candidates scored concurrently.
    pub max_concurrent_fetches: usize,
    /// How candidates are scored.
    pub scoring: ScoringConfig,
    /// How scored candidates are cut down to the final list.
    pub selection: SelectionConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            topic_prefix: Some("Friends".into()),
            search_base_url: "https://www.google.com/search".into(),
            result_offsets: vec![0, 50],
            results_per_page: 50,
            timeout_seconds: 5,
            user_agent: None,
            blocked_domains: vec!["youtube.com".into(), "youtu.be".into()],
            validate_urls: true,
            max_concurrent_fetches: 4,
            scoring: ScoringConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl SearchConfig {
    /// The query actually sent to the search engine.
    pub fn outbound_query(&self, query: &str) -> String {
        match self.topic_prefix.as_deref().map(str::trim) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix} {}", query.trim()),
            _ => query.trim().to_owned(),
        }
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.result_offsets.is_empty() {
            return Err(SearchError::Config(
                "at least one result offset must be configured".into(),
            ));
        }
        if self.results_per_page == 0 {
            return Err(SearchError::Config(
                "results_per_page must be greater than 0".into(),
            ));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(SearchError::Config(
                "max_concurrent_fetches must be greater than 0".into(),
            ));
        }
        if url::Url::parse(&self.search_base_url).is_err() {
            return Err(SearchError::Config(
                "search_base_url is not a valid URL".into(),
            ));
        }
        if self.blocked_domains.iter().any(|d| d.trim().is_empty()) {
            return Err(SearchError::Config(
                "blocked_domains must not contain empty entries".into(),
            ));
        }
        self.scoring.validate()?;
        self.selection.validate()
    }
}

/// Independently toggleable scoring strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Keyword-weight rules applied to every scored text blob.
    pub weights: WeightModel,
    /// Bonus per distinct query token found in a text blob.
    pub query_token_bonus: f64,
    /// Score the candidate's result title.
    pub title: bool,
    /// Score the fetched candidate page (title and body text).
    pub page_body: bool,
    /// Flat bonus for candidates on a reference domain.
    pub domain_bonus: Option<DomainBonus>,
    /// Damped contribution from pages linked by the candidate page.
    pub secondary: Option<SecondaryPages>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: WeightModel::friends(),
            query_token_bonus: 1.0,
            title: true,
            page_body: false,
            domain_bonus: None,
            secondary: Some(SecondaryPages::default()),
        }
    }
}

impl ScoringConfig {
    /// Whether the candidate's own page has to be fetched at all.
    pub fn needs_candidate_page(&self) -> bool {
        self.page_body || self.secondary.as_ref().is_some_and(|s| s.max_links > 0)
    }

    fn validate(&self) -> Result<(), SearchError> {
        self.weights.validate()?;
        if !self.query_token_bonus.is_finite() {
            return Err(SearchError::Config(
                "query_token_bonus must be finite".into(),
            ));
        }
        if let Some(bonus) = &self.domain_bonus {
            if bonus.marker.trim().is_empty() {
                return Err(SearchError::Config(
                    "domain_bonus marker must not be empty".into(),
                ));
            }
            if !bonus.bonus.is_finite() {
                return Err(SearchError::Config("domain_bonus must be finite".into()));
            }
        }
        if let Some(secondary) = &self.secondary {
            if !secondary.damping.is_finite() {
                return Err(SearchError::Config(
                    "secondary damping must be finite".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Flat bonus for URLs containing a reference-domain marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainBonus {
    /// Case-insensitive URL substring, e.g. `wikipedia.org`.
    pub marker: String,
    /// Bonus added when the marker is present.
    pub bonus: f64,
}

impl Default for DomainBonus {
    fn default() -> Self {
        Self {
            marker: "wikipedia.org".into(),
            bonus: 5.0,
        }
    }
}

/// Secondary-page aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryPages {
    /// Outbound links followed per candidate.
    pub max_links: usize,
    /// Multiplier applied to the summed secondary scores.
    pub damping: f64,
}

impl Default for SecondaryPages {
    fn default() -> Self {
        Self {
            max_links: 2,
            damping: 0.5,
        }
    }
}

/// Bounds and gate applied when cutting the ranked list down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Maximum number of results returned.
    pub capacity: usize,
    /// Case-insensitive URL substring identifying the quota domain.
    pub quota_marker: String,
    /// Maximum number of quota-domain results returned.
    pub quota_max: usize,
    /// The list is emptied unless some result scores strictly above this.
    pub relevance_floor: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            capacity: 15,
            quota_marker: "wikipedia.org".into(),
            quota_max: 3,
            relevance_floor: 3.0,
        }
    }
}

impl SelectionConfig {
    fn validate(&self) -> Result<(), SearchError> {
        if self.capacity == 0 {
            return Err(SearchError::Config(
                "capacity must be greater than 0".into(),
            ));
        }
        if self.quota_marker.trim().is_empty() {
            return Err(SearchError::Config("quota_marker must not be empty".into()));
        }
        if !self.relevance_floor.is_finite() {
            return Err(SearchError::Config(
                "relevance_floor must be finite".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.result_offsets, vec![0, 50]);
        assert_eq!(config.results_per_page, 50);
        assert_eq!(config.selection.capacity, 15);
        assert_eq!(config.selection.quota_max, 3);
        assert!((config.selection.relevance_floor - 3.0).abs() < f64::EPSILON);
        assert!(config.user_agent.is_none());
        assert!(config.blocked_domains.contains(&"youtu.be".to_string()));
    }

    #[test]
    fn default_scoring_is_title_plus_secondary() {
        let scoring = ScoringConfig::default();
        assert!(scoring.title);
        assert!(!scoring.page_body);
        assert!(scoring.domain_bonus.is_none());
        let secondary = scoring.secondary.expect("secondary enabled");
        assert_eq!(secondary.max_links, 2);
        assert!((secondary.damping - 0.5).abs() < f64::EPSILON);
        assert!(ScoringConfig::default().needs_candidate_page());
    }

    #[test]
    fn title_only_scoring_needs_no_page_fetch() {
        let scoring = ScoringConfig {
            secondary: None,
            ..Default::default()
        };
        assert!(!scoring.needs_candidate_page());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn empty_offsets_rejected() {
        let config = SearchConfig {
            result_offsets: vec![],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("offset"));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = SearchConfig {
            max_concurrent_fetches: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut config = SearchConfig::default();
        config.selection.capacity = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn zero_quota_is_valid() {
        let mut config = SearchConfig::default();
        config.selection.quota_max = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_finite_damping_rejected() {
        let mut config = SearchConfig::default();
        config.scoring.secondary = Some(SecondaryPages {
            max_links: 2,
            damping: f64::NAN,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("damping"));
    }

    #[test]
    fn bad_base_url_rejected() {
        let config = SearchConfig {
            search_base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn outbound_query_prepends_topic() {
        let config = SearchConfig::default();
        assert_eq!(config.outbound_query("  central perk "), "Friends central perk");
    }

    #[test]
    fn outbound_query_without_topic() {
        let config = SearchConfig {
            topic_prefix: None,
            ..Default::default()
        };
        assert_eq!(config.outbound_query("rachel"), "rachel");

        let blank = SearchConfig {
            topic_prefix: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.outbound_query("rachel"), "rachel");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"selection": {"capacity": 20}}"#).expect("deserialize");
        assert_eq!(config.selection.capacity, 20);
        assert_eq!(config.selection.quota_max, 3);
        assert_eq!(config.timeout_seconds, 5);
        assert!(!config.scoring.weights.is_empty());
    }
}
