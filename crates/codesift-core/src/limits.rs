//! Input validation limits for queries and resource protection

/// Minimum length of a fuzzy path query (1 char)
pub const MIN_FUZZY_QUERY_LEN: usize = 1;

/// Minimum length of a content query (3 bytes)
///
/// The trigram index cannot narrow candidates below one trigram.
pub const MIN_CONTENT_QUERY_LEN: usize = 3;

/// Maximum length of any query (4KB)
pub const MAX_QUERY_LEN: usize = 4 * 1024;

/// Maximum number of typeahead results returned to a client (200)
pub const MAX_TYPEAHEAD_RESULTS: usize = 200;

/// Maximum length of a single line scanned by the line verifier (64KB)
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Default maximum size of an indexed file (1MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `unit` is what `len` counts: "bytes" or "chars"
    QueryTooShort {
        len: usize,
        min: usize,
        unit: &'static str,
    },
    QueryTooLong { len: usize, max: usize },
    InvalidLineNumber,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueryTooShort { len, min, unit } => {
                write!(f, "Query too short: {} {} (min {})", len, unit, min)
            }
            Self::QueryTooLong { len, max } => {
                write!(f, "Query too long: {} bytes (max {})", len, max)
            }
            Self::InvalidLineNumber => write!(f, "Line numbers start at 1"),
        }
    }
}

impl std::error::Error for ValidationError {}

fn validate_query(
    query: &str,
    len: usize,
    min: usize,
    unit: &'static str,
) -> Result<(), ValidationError> {
    if len < min {
        return Err(ValidationError::QueryTooShort { len, min, unit });
    }
    if query.len() > MAX_QUERY_LEN {
        return Err(ValidationError::QueryTooLong {
            len: query.len(),
            max: MAX_QUERY_LEN,
        });
    }
    Ok(())
}

/// Validate a fuzzy (typeahead) query, counted in characters
pub fn validate_fuzzy_query(query: &str) -> Result<(), ValidationError> {
    validate_query(query, query.chars().count(), MIN_FUZZY_QUERY_LEN, "chars")
}

/// Validate a content query, counted in bytes
pub fn validate_content_query(query: &str) -> Result<(), ValidationError> {
    validate_query(query, query.len(), MIN_CONTENT_QUERY_LEN, "bytes")
}

/// Validate a 1-based line number
pub fn validate_line_number(line: usize) -> Result<(), ValidationError> {
    if line == 0 {
        return Err(ValidationError::InvalidLineNumber);
    }
    Ok(())
}

/// Clamp a requested typeahead limit; 0 asks for the maximum
pub fn clamp_typeahead_limit(limit: usize) -> usize {
    if limit == 0 {
        MAX_TYPEAHEAD_RESULTS
    } else {
        limit.min(MAX_TYPEAHEAD_RESULTS)
    }
}
