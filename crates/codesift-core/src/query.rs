//! Query types accepted by the search surfaces

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::limits::{self, ValidationError};

/// Regex content query with an optional file-name filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentQuery {
    /// Regular expression matched against file lines
    pub q: String,

    /// Regular expression matched against file paths (empty matches all)
    #[serde(default)]
    pub f: String,
}

impl ContentQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            f: String::new(),
        }
    }

    /// Restrict the search to paths matching `filter`
    pub fn with_file_filter(mut self, filter: impl Into<String>) -> Self {
        self.f = filter.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        limits::validate_content_query(&self.q)
    }
}

/// Fuzzy path query issued while the user types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeaheadQuery {
    pub q: String,

    /// Requested result count (0 = server maximum)
    #[serde(default)]
    pub limit: usize,
}

impl TypeaheadQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            limit: 0,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Limit after clamping to the server maximum
    pub fn effective_limit(&self) -> usize {
        limits::clamp_typeahead_limit(self.limit)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        limits::validate_fuzzy_query(&self.q)
    }
}

/// Request to open a file at a line in the configured editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRequest {
    pub path: PathBuf,
    /// 1-based line number
    #[serde(default = "default_line")]
    pub line: usize,
}

fn default_line() -> usize {
    1
}

impl OpenRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        limits::validate_line_number(self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_query_builder() {
        let query = ContentQuery::new("foo").with_file_filter("f1$");
        assert_eq!(query.q, "foo");
        assert_eq!(query.f, "f1$");
        assert!(query.validate().is_ok());
        assert!(ContentQuery::new("fo").validate().is_err());
    }

    #[test]
    fn test_typeahead_defaults() {
        let query: TypeaheadQuery = serde_json::from_str(r#"{"q":"type"}"#).unwrap();
        assert_eq!(query.limit, 0);
        assert_eq!(query.effective_limit(), limits::MAX_TYPEAHEAD_RESULTS);
        assert_eq!(query.with_limit(5).effective_limit(), 5);
    }

    #[test]
    fn test_open_request_default_line() {
        let req: OpenRequest = serde_json::from_str(r#"{"path":"src/main.rs"}"#).unwrap();
        assert_eq!(req.line, 1);
        assert!(req.validate().is_ok());
    }
}
