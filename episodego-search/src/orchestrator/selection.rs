//! Ranking and quota-constrained top-K selection.
//!
//! Candidates are ranked by score, one quota-domain result is promoted to
//! the front, the quota domain is capped, and the list is bounded by
//! `capacity`. A relevance gate empties the list when nothing in it scores
//! above the configured floor.

use std::cmp::Ordering;

use crate::config::SelectionConfig;
use crate::types::ScoredCandidate;

/// Sort by score descending.
///
/// The sort is stable, so equal scores keep their incoming (extraction)
/// order. `total_cmp` gives a total order even for non-finite values.
pub fn rank(mut scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| descending(a.score, b.score));
    scored
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Returns `true` if at least one item scores strictly above `floor`.
pub fn passes_relevance_gate(selected: &[ScoredCandidate], floor: f64) -> bool {
    selected.iter().any(|sc| sc.score > floor)
}

/// Rank, promote, cap and gate.
///
/// 1. Rank by score (see [`rank`]).
/// 2. Promote the best-ranked quota-domain candidate to the front.
/// 3. Fill in rank order: non-quota always, quota while under `quota_max`,
///    stopping at `capacity`.
/// 4. Backfill any remaining non-quota candidates until `capacity`.
/// 5. Return nothing if no selected item scores above `relevance_floor`.
pub fn select(scored: Vec<ScoredCandidate>, config: &SelectionConfig) -> Vec<ScoredCandidate> {
    let ranked = rank(scored);
    let marker = config.quota_marker.to_lowercase();
    let quota: Vec<bool> = ranked
        .iter()
        .map(|sc| sc.candidate.url.to_lowercase().contains(&marker))
        .collect();

    let mut placed = vec![false; ranked.len()];
    let mut order: Vec<usize> = Vec::with_capacity(config.capacity.min(ranked.len()));
    let mut quota_used = 0usize;

    // Quota-priority pass.
    if config.capacity > 0 && config.quota_max > 0 {
        if let Some(first) = quota.iter().position(|&q| q) {
            placed[first] = true;
            order.push(first);
            quota_used += 1;
        }
    }

    // Fill pass.
    for i in 0..ranked.len() {
        if order.len() >= config.capacity {
            break;
        }
        if placed[i] {
            continue;
        }
        if quota[i] {
            if quota_used < config.quota_max {
                placed[i] = true;
                order.push(i);
                quota_used += 1;
            }
        } else {
            placed[i] = true;
            order.push(i);
        }
    }

    // Backfill pass: non-quota only.
    for i in 0..ranked.len() {
        if order.len() >= config.capacity {
            break;
        }
        if !placed[i] && !quota[i] {
            placed[i] = true;
            order.push(i);
        }
    }

    let mut slots: Vec<Option<ScoredCandidate>> = ranked.into_iter().map(Some).collect();
    let selected: Vec<ScoredCandidate> = order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect();

    if !passes_relevance_gate(&selected, config.relevance_floor) {
        tracing::debug!(
            count = selected.len(),
            floor = config.relevance_floor,
            "no result above relevance floor"
        );
        return Vec::new();
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candidate;

    fn sc(title: &str, url: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate::new(Candidate::new(title, url), score)
    }

    fn wiki(n: usize, score: f64) -> ScoredCandidate {
        sc(
            &format!("Wiki {n}"),
            &format!("https://en.wikipedia.org/wiki/Page_{n}"),
            score,
        )
    }

    fn other(n: usize, score: f64) -> ScoredCandidate {
        sc(
            &format!("Other {n}"),
            &format!("https://site{n}.example/"),
            score,
        )
    }

    fn config(capacity: usize, quota_max: usize, floor: f64) -> SelectionConfig {
        SelectionConfig {
            capacity,
            quota_marker: "wikipedia.org".into(),
            quota_max,
            relevance_floor: floor,
        }
    }

    fn titles(selected: &[ScoredCandidate]) -> Vec<&str> {
        selected.iter().map(|s| s.candidate.title.as_str()).collect()
    }

    fn is_wiki(s: &ScoredCandidate) -> bool {
        s.candidate.url.contains("wikipedia.org")
    }

    #[test]
    fn rank_sorts_descending() {
        let ranked = rank(vec![other(1, 1.0), other(2, 9.0), other(3, 4.0)]);
        assert_eq!(titles(&ranked), vec!["Other 2", "Other 3", "Other 1"]);
    }

    #[test]
    fn rank_ties_keep_extraction_order() {
        let ranked = rank(vec![other(1, 5.0), other(2, 7.0), other(3, 5.0), other(4, 5.0)]);
        assert_eq!(
            titles(&ranked),
            vec!["Other 2", "Other 1", "Other 3", "Other 4"]
        );
    }

    #[test]
    fn never_exceeds_capacity() {
        let scored: Vec<_> = (0..40).map(|i| other(i, 10.0 + i as f64)).collect();
        let selected = select(scored, &config(15, 3, 0.0));
        assert_eq!(selected.len(), 15);
    }

    #[test]
    fn never_exceeds_quota() {
        let mut scored: Vec<_> = (0..10).map(|i| wiki(i, 20.0)).collect();
        scored.extend((0..3).map(|i| other(i, 5.0)));
        let selected = select(scored, &config(15, 3, 0.0));
        assert_eq!(selected.iter().filter(|s| is_wiki(s)).count(), 3);
        assert_eq!(selected.len(), 6);
    }

    #[test]
    fn quota_candidate_promoted_to_front() {
        let scored = vec![other(1, 12.0), other(2, 11.0), wiki(1, 4.0), other(3, 10.0)];
        let selected = select(scored, &config(15, 3, 0.0));
        assert!(is_wiki(&selected[0]));
        assert_eq!(
            titles(&selected),
            vec!["Wiki 1", "Other 1", "Other 2", "Other 3"]
        );
    }

    #[test]
    fn best_quota_candidate_is_the_one_promoted() {
        let scored = vec![wiki(1, 2.0), other(1, 9.0), wiki(2, 6.0)];
        let selected = select(scored, &config(15, 3, 0.0));
        assert_eq!(titles(&selected), vec!["Wiki 2", "Other 1", "Wiki 1"]);
    }

    #[test]
    fn promoted_quota_candidate_survives_tight_capacity() {
        let scored = vec![other(1, 12.0), other(2, 11.0), wiki(1, 4.0)];
        let selected = select(scored, &config(2, 3, 0.0));
        assert_eq!(titles(&selected), vec!["Wiki 1", "Other 1"]);
    }

    #[test]
    fn zero_quota_excludes_domain_entirely() {
        let scored = vec![wiki(1, 50.0), other(1, 9.0), other(2, 8.0)];
        let selected = select(scored, &config(15, 0, 0.0));
        assert_eq!(titles(&selected), vec!["Other 1", "Other 2"]);
    }

    #[test]
    fn no_quota_candidates_output_is_plain_ranking() {
        let scored = vec![other(1, 3.5), other(2, 8.0), other(3, 6.0)];
        let selected = select(scored, &config(15, 3, 0.0));
        assert_eq!(titles(&selected), vec!["Other 2", "Other 3", "Other 1"]);
    }

    #[test]
    fn quota_marker_is_case_insensitive() {
        let scored = vec![
            other(1, 9.0),
            sc("Upper", "https://EN.WIKIPEDIA.ORG/wiki/Friends", 4.0),
        ];
        let selected = select(scored, &config(15, 3, 0.0));
        assert_eq!(selected[0].candidate.title, "Upper");
    }

    #[test]
    fn all_scores_at_or_below_floor_yield_empty() {
        let scored = vec![wiki(1, 3.0), other(1, 2.0), other(2, -1.0)];
        assert!(select(scored, &config(15, 3, 3.0)).is_empty());
    }

    #[test]
    fn one_score_above_floor_keeps_whole_selection() {
        let scored = vec![wiki(1, 3.5), other(1, 2.0), other(2, -1.0)];
        let selected = select(scored, &config(15, 3, 3.0));
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn empty_input_yields_empty() {
        assert!(select(vec![], &config(15, 3, 0.0)).is_empty());
    }

    #[test]
    fn selection_is_idempotent() {
        let mut scored: Vec<_> = (0..6).map(|i| wiki(i, 1.0 + i as f64)).collect();
        scored.extend((0..20).map(|i| other(i, (i % 7) as f64)));
        let cfg = config(15, 3, 0.0);
        let once = select(scored, &cfg);
        let twice = select(once.clone(), &cfg);
        assert_eq!(once, twice);
    }

    #[test]
    fn friends_scenario_keeps_only_relevant_entry() {
        // Weights {"friends": +3.0, "movie": -3.0}, query "friends":
        // "Friends (TV)" scores 3.0 + 1.0 token bonus, the movie entry
        // 3.0 - 3.0 + 1.0 = 1.0. With capacity 2 both are selected and the
        // set passes the gate because one entry exceeds the floor.
        let scored = vec![
            sc("Friends (TV)", "https://en.wikipedia.org/wiki/Friends", 4.0),
            sc("Friends the Movie", "https://movies.example/friends", 1.0),
        ];
        let selected = select(scored, &config(2, 1, 0.0));
        assert_eq!(titles(&selected), vec!["Friends (TV)", "Friends the Movie"]);

        let gated = select(selected, &config(2, 1, 4.0));
        assert!(gated.is_empty());
    }

    #[test]
    fn negative_scores_rank_last() {
        let scored = vec![other(1, -3.0), other(2, 5.0), other(3, 0.0)];
        let selected = select(scored, &config(15, 3, 0.0));
        assert_eq!(titles(&selected), vec!["Other 2", "Other 3", "Other 1"]);
    }

    #[test]
    fn gate_helper() {
        assert!(!passes_relevance_gate(&[], 0.0));
        assert!(passes_relevance_gate(&[other(1, 0.1)], 0.0));
        assert!(!passes_relevance_gate(&[other(1, 0.0)], 0.0));
    }
}
