//! Verified content matches and search diagnostics

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A verified content hit: the first match on one line of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// Line text without its terminator
    pub line: String,
    /// Byte offset of the match start within `line`
    pub start: usize,
    /// Byte offset of the match end within `line`
    pub end: usize,
}

impl Match {
    pub fn matched_text(&self) -> &str {
        &self.line[self.start..self.end]
    }

    /// Line text with the matched span wrapped in `marker`
    pub fn highlighted(&self, marker: &str) -> String {
        format!(
            "{}{}{}{}{}",
            &self.line[..self.start],
            marker,
            self.matched_text(),
            marker,
            &self.line[self.end..]
        )
    }

    /// Same match with `prefix` removed from the displayed path
    pub fn strip_path_prefix(mut self, prefix: &Path) -> Self {
        if let Ok(rest) = self.path.strip_prefix(prefix) {
            self.path = rest.to_path_buf();
        }
        self
    }
}

/// Counters and timings reported by one content search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Files returned by the index query
    pub candidates: usize,
    /// Candidates that passed the file filter
    pub filtered: usize,
    /// Filtered files with at least one verified match
    pub files_matched: usize,
    /// Filtered files with no verified match
    pub false_positives: usize,
    /// Candidates skipped because the file no longer exists
    pub stale: usize,
    /// Total verified matches
    pub matches: usize,
    pub retrieval_time: Duration,
    pub verification_time: Duration,
}
