//! Codesift Index - Trigram candidate index
//!
//! Maps a parsed regular expression to a superset of the files that may
//! contain a match. The superset can hold false positives but never omits a
//! file that matches.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod plan;
pub mod snapshot;
pub mod traits;
pub mod trigram;
pub mod walk;

#[cfg(feature = "redb")]
pub mod redb;

pub use error::{IndexError, IndexResult};
pub use plan::TrigramQuery;
pub use snapshot::{IndexSnapshot, SnapshotHandle};
pub use traits::{CandidateIndex, FileId};
pub use trigram::TrigramIndex;
pub use walk::IndexBuilder;

#[cfg(feature = "redb")]
pub use redb::{IndexStore, SCHEMA_VERSION};
