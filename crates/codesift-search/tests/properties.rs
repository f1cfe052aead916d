//! Property tests for path scoring and result collection

use codesift_core::{Candidate, Corpus};
use codesift_search::fuzzy::{fast_contains, file_name_score, fuzzy_score, score, NO_MATCH};
use codesift_search::{BoundedTopK, TwoPhaseMatcher};
use proptest::prelude::*;

fn ascii_path() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{0,40}"
}

fn ascii_query() -> impl Strategy<Value = String> {
    "[a-zA-Z_.]{1,6}"
}

proptest! {
    /// For ASCII input the fast filter rejects exactly the non-matches
    #[test]
    fn fast_filter_agrees_with_score(path in ascii_path(), query in ascii_query()) {
        let passes = fast_contains(path.as_bytes(), query.as_bytes());
        let s = score(&path, &query);
        if passes {
            prop_assert!(s >= 0, "{} / {} passed the filter but scored {}", path, query, s);
        } else {
            prop_assert_eq!(s, NO_MATCH);
        }
        prop_assert_eq!(passes, fuzzy_score(&path, &query) >= 0);
    }

    #[test]
    fn exact_file_name_scores_510(dir in "[a-z]{0,8}/", name in "[a-zA-Z0-9_.-]{1,12}") {
        let path = format!("{}{}", dir, name);
        prop_assert_eq!(score(&path, &name), 510);
    }

    #[test]
    fn topk_never_exceeds_limit(
        scores in prop::collection::vec(-5i32..100, 0..60),
        limit in 0usize..8,
    ) {
        let mut top = BoundedTopK::new(limit);
        for (i, s) in scores.iter().enumerate() {
            top.add(i, *s);
            if limit > 0 {
                prop_assert!(top.len() <= limit);
            }
        }

        let expected_total = scores.iter().filter(|s| **s >= 0).count();
        prop_assert_eq!(top.total_matches(), expected_total);

        let results = top.into_scored_results();
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].item < pair[1].item || limit > 0);
            }
        }
        if limit == 0 {
            prop_assert_eq!(results.len(), expected_total);
        }
    }

    #[test]
    fn two_phase_respects_limit(
        paths in prop::collection::vec(ascii_path(), 0..30),
        query in ascii_query(),
        limit in 1usize..6,
    ) {
        let corpus: Corpus = paths.iter().map(|p| Candidate::new(p.as_str())).collect();
        let found = TwoPhaseMatcher::new(&corpus).find(&query, limit);

        prop_assert!(found.candidates.len() <= limit);
        for c in &found.candidates {
            prop_assert!(score(c.path(), &query) >= 0);
        }

        let name_matches = corpus
            .iter()
            .filter(|c| file_name_score(c, &query) >= 0)
            .count();
        if name_matches >= limit {
            prop_assert!(!found.full_path_pass);
            for c in &found.candidates {
                prop_assert!(file_name_score(c, &query) >= 0);
            }
        }
    }
}
