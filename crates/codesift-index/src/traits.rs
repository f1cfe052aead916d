//! Candidate index trait definitions

use std::path::Path;

use crate::plan::TrigramQuery;

/// Opaque identifier of an indexed file
pub type FileId = u32;

/// Trait for indexes that narrow a content query to candidate files
///
/// Implementations must never omit a file that could match the query; extra
/// files are allowed and are filtered out by line verification.
pub trait CandidateIndex: Send + Sync {
    /// File ids that may match `query`, in ascending id order
    fn candidates(&self, query: &TrigramQuery) -> Vec<FileId>;

    /// Resolve a file id to its path
    fn path(&self, id: FileId) -> Option<&Path>;

    /// Number of indexed files
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All indexed paths in id order
    fn paths(&self) -> Box<dyn Iterator<Item = &Path> + '_>;
}
