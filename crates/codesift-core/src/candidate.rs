//! Candidate paths and the immutable corpus they form

use std::path::{is_separator, Path};

use crate::error::{Error, Result};

/// One indexable path
///
/// The file name is located once at construction and never recomputed.
/// A candidate may hide a leading prefix of its path: scoring only sees
/// [`Candidate::relative_path`], while [`Candidate::path`] keeps the full
/// path for resolving the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    path: String,
    relative_start: usize,
    name_start: usize,
}

impl Candidate {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name_start = path.rfind(is_separator).map_or(0, |i| i + 1);
        Self {
            path,
            relative_start: 0,
            name_start,
        }
    }

    /// Build a candidate from a filesystem path, rejecting non-UTF-8 paths
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = path
            .to_str()
            .ok_or_else(|| Error::MalformedInput(format!("non UTF-8 path: {}", path.display())))?;
        Ok(Self::new(text))
    }

    /// Like [`Candidate::from_path`], hiding `prefix` from scoring when
    /// `path` lies under it
    pub fn under_prefix(path: &Path, prefix: &Path) -> Result<Self> {
        let mut candidate = Self::from_path(path)?;
        if let Some(rest) = path.strip_prefix(prefix).ok().and_then(Path::to_str) {
            candidate.relative_start = candidate.path.len() - rest.len();
            candidate.name_start = candidate.name_start.max(candidate.relative_start);
        }
        Ok(candidate)
    }

    /// Full path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path with the hidden prefix removed; this is what gets scored
    pub fn relative_path(&self) -> &str {
        &self.path[self.relative_start..]
    }

    /// Text after the last path separator (the whole path if there is none)
    pub fn file_name(&self) -> &str {
        &self.path[self.name_start..]
    }

    pub fn into_path(self) -> String {
        self.path
    }
}

impl From<&str> for Candidate {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Candidate {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

/// Read-only list of candidates searched by the path matcher
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    candidates: Vec<Candidate>,
}

impl Corpus {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Build a corpus from filesystem paths
    ///
    /// Paths that are not valid UTF-8 cannot be scored and are skipped
    /// individually.
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
        Self::from_paths_under(paths, None)
    }

    /// Build a corpus whose candidates hide `prefix` from scoring
    pub fn from_paths_under<'a>(
        paths: impl IntoIterator<Item = &'a Path>,
        prefix: Option<&Path>,
    ) -> Self {
        let mut candidates = Vec::new();
        for path in paths {
            let candidate = match prefix {
                Some(prefix) => Candidate::under_prefix(path, prefix),
                None => Candidate::from_path(path),
            };
            match candidate {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => tracing::warn!("Skipping corpus entry: {}", e),
            }
        }
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Candidate> {
        self.candidates.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }
}

impl FromIterator<Candidate> for Corpus {
    fn from_iter<T: IntoIterator<Item = Candidate>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(Candidate::new("a/b/c/PlaceType.java").file_name(), "PlaceType.java");
        assert_eq!(Candidate::new("README").file_name(), "README");
        assert_eq!(Candidate::new("/abs/path/x.rs").file_name(), "x.rs");
        assert_eq!(Candidate::new("dir/").file_name(), "");
    }

    #[test]
    fn test_under_prefix() {
        let c = Candidate::under_prefix(
            Path::new("/home/alice/repo/src/a.rs"),
            Path::new("/home/alice/repo"),
        )
        .unwrap();
        assert_eq!(c.path(), "/home/alice/repo/src/a.rs");
        assert_eq!(c.relative_path(), "src/a.rs");
        assert_eq!(c.file_name(), "a.rs");

        let outside = Candidate::under_prefix(Path::new("/opt/b.rs"), Path::new("/home")).unwrap();
        assert_eq!(outside.relative_path(), "/opt/b.rs");

        let corpus = Corpus::from_paths_under(
            [Path::new("/repo/x/y.rs")],
            Some(Path::new("/repo")),
        );
        assert_eq!(corpus.get(0).map(Candidate::relative_path), Some("x/y.rs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_from_path_rejects_invalid_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bad = Path::new(OsStr::from_bytes(b"dir/\xff\xfe.txt"));
        assert!(matches!(
            Candidate::from_path(bad),
            Err(Error::MalformedInput(_))
        ));

        let good = Path::new("dir/ok.txt");
        let corpus = Corpus::from_paths([bad, good]);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(0).map(Candidate::path), Some("dir/ok.txt"));
    }
}
