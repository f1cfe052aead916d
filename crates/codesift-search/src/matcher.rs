//! Two-phase path matching for typeahead
//!
//! Phase 1 scores only the file name of every candidate. If that alone fills
//! the result limit, the more expensive whole-path pass never runs. Phase 2
//! scores the whole path of candidates phase 1 did not match and stops as
//! soon as the limit is reached.

use codesift_core::{Candidate, Corpus, TypeaheadQuery};

use crate::error::SearchResult;
use crate::fuzzy::{file_name_score, score_candidate};
use crate::topk::BoundedTopK;

/// Ranked candidates for one path query
#[derive(Debug, Clone)]
pub struct PathMatches<'a> {
    pub candidates: Vec<&'a Candidate>,
    /// Matches seen while collecting, including ones not kept
    pub total_matches: usize,
    /// Whether the whole-path pass ran
    pub full_path_pass: bool,
}

impl<'a> PathMatches<'a> {
    pub fn paths(&self) -> Vec<&'a str> {
        self.candidates.iter().map(|c| c.path()).collect()
    }
}

/// Matches a query against a corpus; a limit of 0 returns every match
pub struct TwoPhaseMatcher<'a> {
    corpus: &'a Corpus,
}

impl<'a> TwoPhaseMatcher<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    pub fn find(&self, query: &str, limit: usize) -> PathMatches<'a> {
        let corpus = self.corpus;
        let mut top = BoundedTopK::new(limit);
        let mut matched = vec![false; corpus.len()];

        for (i, candidate) in corpus.iter().enumerate() {
            let s = file_name_score(candidate, query);
            if s >= 0 {
                matched[i] = true;
                top.add(i, s);
            }
        }

        let full_path_pass = !top.is_full();
        if full_path_pass {
            for (i, candidate) in corpus.iter().enumerate() {
                if top.is_full() {
                    break;
                }
                if matched[i] {
                    continue;
                }
                top.add(i, score_candidate(candidate, query));
            }
        }

        let total_matches = top.total_matches();
        let candidates = top
            .into_results()
            .into_iter()
            .filter_map(|i| corpus.get(i))
            .collect();
        PathMatches {
            candidates,
            total_matches,
            full_path_pass,
        }
    }

    /// Validate and run a typeahead request with its clamped limit
    pub fn typeahead(&self, query: &TypeaheadQuery) -> SearchResult<PathMatches<'a>> {
        query.validate()?;
        let matches = self.find(&query.q, query.effective_limit());
        tracing::debug!(
            "typeahead {:?}: {} of {} matches (full path pass: {})",
            query.q,
            matches.candidates.len(),
            matches.total_matches,
            matches.full_path_pass
        );
        Ok(matches)
    }
}

/// Shorthand for [`TwoPhaseMatcher::find`]
pub fn two_phase_match<'a>(corpus: &'a Corpus, query: &str, limit: usize) -> Vec<&'a str> {
    TwoPhaseMatcher::new(corpus).find(query, limit).paths()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    fn corpus(paths: &[&str]) -> Corpus {
        paths.iter().map(|p| Candidate::new(*p)).collect()
    }

    #[test]
    fn test_file_name_pass_fills_limit() {
        let corpus = corpus(&[
            "type/a.java",
            "src/PlaceType.java",
            "t/y/p/e.txt",
            "lib/TypeAheadHandler.java",
        ]);
        let matches = TwoPhaseMatcher::new(&corpus).find("type", 2);

        assert!(!matches.full_path_pass);
        assert_eq!(
            matches.paths(),
            vec!["lib/TypeAheadHandler.java", "src/PlaceType.java"]
        );
    }

    #[test]
    fn test_full_path_pass_tops_up() {
        let corpus = corpus(&[
            "type/a.java",
            "src/PlaceType.java",
            "t/y/p/e.txt",
            "other/readme",
        ]);
        let matches = TwoPhaseMatcher::new(&corpus).find("type", 3);

        assert!(matches.full_path_pass);
        assert_eq!(matches.paths()[0], "src/PlaceType.java");
        assert_eq!(matches.candidates.len(), 3);
        assert!(!matches.paths().contains(&"other/readme"));
    }

    #[test]
    fn test_unlimited_returns_all_matches() {
        let corpus = corpus(&["a/hello", "b/helloworld", "c/he-match-llo", "d/goodbye"]);
        assert_eq!(
            two_phase_match(&corpus, "hello", 0),
            vec!["a/hello", "b/helloworld", "c/he-match-llo"]
        );
    }

    #[test]
    fn test_phase_one_matches_are_not_rescored() {
        let corpus = corpus(&["src/hello", "src/other"]);
        let matches = TwoPhaseMatcher::new(&corpus).find("hello", 5);
        assert_eq!(matches.paths(), vec!["src/hello"]);
        assert_eq!(matches.total_matches, 1);
    }

    #[test]
    fn test_typeahead_validates() {
        let corpus = corpus(&["src/hello"]);
        let matcher = TwoPhaseMatcher::new(&corpus);
        assert!(matches!(
            matcher.typeahead(&TypeaheadQuery::new("")),
            Err(SearchError::QueryTooShort { .. })
        ));
        let found = matcher.typeahead(&TypeaheadQuery::new("hel")).unwrap();
        assert_eq!(found.paths(), vec!["src/hello"]);
    }

    #[test]
    fn test_hidden_prefix_is_not_scored() {
        let corpus = Corpus::from_paths_under(
            [
                std::path::Path::new("/home/alice/repo/src/a.rs"),
                std::path::Path::new("/home/alice/repo/lib/b.rs"),
            ],
            Some(std::path::Path::new("/home/alice/repo")),
        );
        assert!(two_phase_match(&corpus, "hali", 10).is_empty());
        assert_eq!(
            two_phase_match(&corpus, "srca", 10),
            vec!["/home/alice/repo/src/a.rs"]
        );
    }
}
