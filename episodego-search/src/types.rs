//! Core types flowing through the extract → score → select pipeline.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single title/URL pair considered for ranking.
///
/// Produced by result-page extraction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Visible title of the search result. Never empty.
    pub title: String,
    /// Absolute http(s) destination URL.
    pub url: String,
}

impl Candidate {
    /// Create a candidate from a title and destination URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A candidate together with its composite relevance score.
///
/// Scores may be negative when distractor rules fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The candidate that was scored.
    pub candidate: Candidate,
    /// Composite relevance score (higher is better).
    pub score: f64,
}

impl ScoredCandidate {
    /// Pair a candidate with its score.
    pub fn new(candidate: Candidate, score: f64) -> Self {
        Self { candidate, score }
    }
}

/// Readable content extracted from a fetched page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// The URL that was fetched.
    pub url: String,
    /// The page title extracted from HTML.
    pub title: String,
    /// Visible body text with scripts and styles removed.
    pub text: String,
    /// Number of words in the extracted text.
    pub word_count: usize,
}

impl PageContent {
    /// Title and body joined, which is the text blob scored for a page.
    pub fn scoring_text(&self) -> String {
        if self.title.is_empty() {
            self.text.clone()
        } else {
            format!("{} {}", self.title, self.text)
        }
    }
}

/// The final ordered `title → url` answer for one query.
///
/// Serialises as a JSON object whose keys appear in selection order.
/// An empty value means either "nothing relevant" or "search failed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedResults {
    entries: Vec<(String, String)>,
}

impl RankedResults {
    /// An empty result set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(title, url)` pairs in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, u)| (t.as_str(), u.as_str()))
    }

    /// Titles in selection order.
    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|(t, _)| t.as_str()).collect()
    }

    /// Look up the URL for a title.
    pub fn get(&self, title: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, u)| u.as_str())
    }
}

impl From<Vec<ScoredCandidate>> for RankedResults {
    fn from(selected: Vec<ScoredCandidate>) -> Self {
        let entries = selected
            .into_iter()
            .map(|sc| (sc.candidate.title, sc.candidate.url))
            .collect();
        Self { entries }
    }
}

impl Serialize for RankedResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (title, url) in &self.entries {
            map.serialize_entry(title, url)?;
        }
        map.end()
    }
}
