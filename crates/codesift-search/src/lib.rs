//! Codesift Search - Path ranking and content verification
//!
//! Provides the fuzzy path scorer with its bounded collector and two-phase
//! matcher, plus the line verifier and the content search pipeline that
//! turns index candidates into exact matches.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod fuzzy;
pub mod grep;
pub mod matcher;
pub mod pipeline;
pub mod topk;

pub use error::{SearchError, SearchResult};
pub use fuzzy::{fast_contains, score, score_bytes, score_candidate};
pub use grep::grep_file;
pub use matcher::{two_phase_match, PathMatches, TwoPhaseMatcher};
pub use pipeline::{SearchOutcome, SearchPipeline};
pub use topk::{BoundedTopK, ScoredResult};
