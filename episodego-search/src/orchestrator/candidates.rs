//! Title-keyed candidate collection.
//!
//! Extraction keys results by their visible title: two results with the
//! same title collapse into one entry and the later URL wins. The entry
//! keeps the position where the title was first seen, so extraction order
//! stays stable and can serve as the ranking tie-break.

use std::collections::HashMap;

use crate::types::Candidate;

/// Insertion-ordered `title → url` collection with overwrite-on-duplicate.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    entries: Vec<Candidate>,
    index: HashMap<String, usize>,
}

impl CandidateSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate, returning the URL it replaced if the title was
    /// already present.
    pub fn insert(&mut self, candidate: Candidate) -> Option<String> {
        match self.index.get(&candidate.title) {
            Some(&pos) => Some(std::mem::replace(
                &mut self.entries[pos].url,
                candidate.url,
            )),
            None => {
                self.index.insert(candidate.title.clone(), self.entries.len());
                self.entries.push(candidate);
                None
            }
        }
    }

    /// Fold every candidate of `other` into this set, in `other`'s order.
    pub fn merge(&mut self, other: impl IntoIterator<Item = Candidate>) {
        for candidate in other {
            if let Some(previous) = self.insert(candidate) {
                tracing::trace!(previous = %previous, "duplicate title replaced");
            }
        }
    }

    /// Number of distinct titles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URL currently stored for `title`.
    pub fn get(&self, title: &str) -> Option<&str> {
        self.index
            .get(title)
            .map(|&pos| self.entries[pos].url.as_str())
    }

    /// Candidates in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    /// Consume the set, yielding candidates in first-seen order.
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.entries
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        let mut set = Self::new();
        set.merge(iter);
        set
    }
}
