//! Content search: index candidates, file filter, line verification

use std::time::Instant;

use codesift_core::{limits, ContentQuery, Match, SearchStats};
use codesift_index::{CandidateIndex, IndexError, TrigramQuery};
use regex::bytes::Regex;

use crate::error::{SearchError, SearchResult};
use crate::grep::grep_file;

/// Verified matches and the diagnostics collected while producing them
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub matches: Vec<Match>,
    pub stats: SearchStats,
}

/// Runs content queries against one candidate index
pub struct SearchPipeline<'a, I: CandidateIndex + ?Sized> {
    index: &'a I,
}

impl<'a, I: CandidateIndex + ?Sized> SearchPipeline<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    pub fn run(&self, query: &ContentQuery) -> SearchResult<SearchOutcome> {
        self.search(&query.q, &query.f)
    }

    /// Search for `query` in files whose path matches `file_filter`
    ///
    /// An empty filter matches every file. Files deleted since indexing are
    /// skipped and counted; any other file error fails the whole search.
    pub fn search(&self, query: &str, file_filter: &str) -> SearchResult<SearchOutcome> {
        let start = Instant::now();

        limits::validate_content_query(query)?;
        let plan = TrigramQuery::from_pattern(query).map_err(|e| SearchError::InvalidPattern {
            pattern: query.to_string(),
            message: e.to_string(),
        })?;
        let regex = Regex::new(query).map_err(|e| SearchError::InvalidPattern {
            pattern: query.to_string(),
            message: e.to_string(),
        })?;
        let filter = if file_filter.is_empty() {
            None
        } else {
            Some(
                regex::Regex::new(file_filter).map_err(|source| {
                    SearchError::InvalidFilterPattern {
                        pattern: file_filter.to_string(),
                        source,
                    }
                })?,
            )
        };

        tracing::debug!("query plan for {:?}: {}", query, plan);
        let ids = self.index.candidates(&plan);
        let retrieved = Instant::now();

        let mut stats = SearchStats {
            candidates: ids.len(),
            ..SearchStats::default()
        };
        let mut matches = Vec::new();

        for id in ids {
            let path = self
                .index
                .path(id)
                .ok_or_else(|| IndexError::Corrupt(format!("unknown file id {}", id)))?;
            if let Some(filter) = &filter {
                if !filter.is_match(&path.to_string_lossy()) {
                    continue;
                }
            }
            stats.filtered += 1;

            match grep_file(&regex, path) {
                Ok(found) if found.is_empty() => stats.false_positives += 1,
                Ok(found) => {
                    stats.files_matched += 1;
                    matches.extend(found);
                }
                Err(SearchError::StaleIndexEntry { path }) => {
                    tracing::warn!("Skipping stale index entry {}", path.display());
                    stats.stale += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let verified = Instant::now();
        stats.matches = matches.len();
        stats.retrieval_time = retrieved - start;
        stats.verification_time = verified - retrieved;

        tracing::info!(
            "search {:?}: {} candidates, {} filtered, {} matched, {} false positives, {} stale",
            query,
            stats.candidates,
            stats.filtered,
            stats.files_matched,
            stats.false_positives,
            stats.stale
        );
        tracing::info!(
            "retrieval time: {:?} verification time: {:?}",
            stats.retrieval_time,
            stats.verification_time
        );

        Ok(SearchOutcome { matches, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesift_index::{FileId, IndexBuilder, TrigramIndex};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{tempdir, TempDir};

    fn fixture() -> (TempDir, TrigramIndex) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("f1"), "hello world f1\nfoo bar\n").unwrap();
        fs::write(dir.path().join("f2"), "hello world f2\nfoo bar\n").unwrap();
        let index = IndexBuilder::new().root(dir.path()).build().unwrap();
        (dir, index)
    }

    /// Counts index queries
    struct CountingIndex {
        inner: TrigramIndex,
        queries: AtomicUsize,
    }

    impl CandidateIndex for CountingIndex {
        fn candidates(&self, query: &TrigramQuery) -> Vec<FileId> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.candidates(query)
        }

        fn path(&self, id: FileId) -> Option<&Path> {
            self.inner.path(id)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }

        fn paths(&self) -> Box<dyn Iterator<Item = &Path> + '_> {
            self.inner.paths()
        }
    }

    #[test]
    fn test_end_to_end() {
        let (dir, index) = fixture();
        let pipeline = SearchPipeline::new(&index);

        let outcome = pipeline.search(" f1", "").unwrap();
        assert_eq!(outcome.matches.len(), 1);
        let m = &outcome.matches[0];
        assert_eq!(m.path, dir.path().join("f1"));
        assert_eq!(m.line_number, 1);
        assert_eq!(m.line, "hello world f1");
        assert_eq!((m.start, m.end), (11, 14));
        assert_eq!(outcome.stats.candidates, 1);

        let outcome = pipeline.search("foo", "").unwrap();
        assert_eq!(outcome.matches.len(), 2);
        assert!(outcome.matches.iter().all(|m| m.line_number == 2));
        assert_eq!(outcome.stats.files_matched, 2);

        let outcome = pipeline.run(&ContentQuery::new("foo").with_file_filter("f1$")).unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.stats.candidates, 2);
        assert_eq!(outcome.stats.filtered, 1);
    }

    #[test]
    fn test_false_positive_counted() {
        let (_dir, index) = fixture();
        // Both files hold the trigrams, but no single line matches
        let outcome = SearchPipeline::new(&index).search("bar.*f1|f1.*foo", "").unwrap();
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.stats.false_positives, outcome.stats.filtered);
    }

    #[test]
    fn test_stale_file_skipped() {
        let (dir, index) = fixture();
        fs::remove_file(dir.path().join("f2")).unwrap();

        let outcome = SearchPipeline::new(&index).search("foo", "").unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].path, dir.path().join("f1"));
        assert_eq!(outcome.stats.stale, 1);
    }

    #[test]
    fn test_unreadable_candidate_aborts_search() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("a");
        let unreadable = dir.path().join("b");
        fs::write(&good, "foo bar\n").unwrap();
        fs::create_dir(&unreadable).unwrap();

        let mut index = TrigramIndex::new(Vec::new());
        index.insert(good, b"foo bar\n");
        index.insert(unreadable.clone(), b"foo");

        match SearchPipeline::new(&index).search("foo", "") {
            Err(SearchError::FileAccess { path, .. }) => assert_eq!(path, unreadable),
            other => panic!("expected a file access error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_query_skips_index() {
        let (_dir, inner) = fixture();
        let index = CountingIndex {
            inner,
            queries: AtomicUsize::new(0),
        };
        let pipeline = SearchPipeline::new(&index);

        assert!(matches!(
            pipeline.search("fo", ""),
            Err(SearchError::QueryTooShort { len: 2, min: 3, .. })
        ));
        assert_eq!(index.queries.load(Ordering::SeqCst), 0);

        pipeline.search("foo", "").unwrap();
        assert_eq!(index.queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_patterns() {
        let (_dir, index) = fixture();
        let pipeline = SearchPipeline::new(&index);

        assert!(matches!(
            pipeline.search("foo(", ""),
            Err(SearchError::InvalidPattern { .. })
        ));
        assert!(matches!(
            pipeline.search("foo", "f1["),
            Err(SearchError::InvalidFilterPattern { .. })
        ));
    }

    #[test]
    fn test_unresolved_file_id_is_index_error() {
        struct Unresolved(TrigramIndex);

        impl CandidateIndex for Unresolved {
            fn candidates(&self, query: &TrigramQuery) -> Vec<FileId> {
                self.0.candidates(query)
            }

            fn path(&self, _id: FileId) -> Option<&Path> {
                None
            }

            fn len(&self) -> usize {
                self.0.len()
            }

            fn paths(&self) -> Box<dyn Iterator<Item = &Path> + '_> {
                self.0.paths()
            }
        }

        let mut inner = TrigramIndex::new(Vec::new());
        inner.insert(PathBuf::from("f1"), b"foo bar");
        let index = Unresolved(inner);
        assert!(matches!(
            SearchPipeline::new(&index).search("foo", ""),
            Err(SearchError::Index(IndexError::Corrupt(_)))
        ));
    }
}
