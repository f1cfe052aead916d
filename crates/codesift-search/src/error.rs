//! Search error types

use std::path::PathBuf;

use codesift_core::ValidationError;
use codesift_index::IndexError;
use thiserror::Error;

/// Result type alias for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Search-specific error types
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Query too short: {len} {unit} (min {min})")]
    QueryTooShort {
        len: usize,
        min: usize,
        unit: &'static str,
    },

    #[error("Query too long: {len} bytes (max {max})")]
    QueryTooLong { len: usize, max: usize },

    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid file filter {pattern:?}: {source}")]
    InvalidFilterPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to {operation} {path}: {source}")]
    FileAccess {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Indexed file no longer exists: {path}")]
    StaleIndexEntry { path: PathBuf },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("{path}:{line_number}: line exceeds {max} bytes")]
    LineTooLong {
        path: PathBuf,
        line_number: usize,
        max: usize,
    },

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

impl SearchError {
    /// Errors caused by the request itself rather than the service
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            SearchError::QueryTooShort { .. }
                | SearchError::QueryTooLong { .. }
                | SearchError::InvalidPattern { .. }
                | SearchError::InvalidFilterPattern { .. }
                | SearchError::MalformedInput(_)
        )
    }
}

impl From<ValidationError> for SearchError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::QueryTooShort { len, min, unit } => {
                SearchError::QueryTooShort { len, min, unit }
            }
            ValidationError::QueryTooLong { len, max } => SearchError::QueryTooLong { len, max },
            other => SearchError::MalformedInput(other.to_string()),
        }
    }
}

impl From<codesift_core::Error> for SearchError {
    fn from(err: codesift_core::Error) -> Self {
        match err {
            codesift_core::Error::Validation(v) => v.into(),
            other => SearchError::MalformedInput(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesift_core::limits::{validate_content_query, validate_fuzzy_query};

    #[test]
    fn test_too_short_keeps_unit() {
        let content: SearchError = validate_content_query("fo").unwrap_err().into();
        assert_eq!(content.to_string(), "Query too short: 2 bytes (min 3)");

        let fuzzy: SearchError = validate_fuzzy_query("").unwrap_err().into();
        assert_eq!(fuzzy.to_string(), "Query too short: 0 chars (min 1)");
        assert!(fuzzy.is_invalid_request());
    }
}
