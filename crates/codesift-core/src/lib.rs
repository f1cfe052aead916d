//! Codesift Core - Shared types for code search
//!
//! This crate provides the candidate corpus, match records, input limits
//! and configuration used by the index, search and serving crates.

pub mod candidate;
pub mod config;
pub mod error;
pub mod limits;
pub mod matches;
pub mod query;

pub use candidate::{Candidate, Corpus};
pub use config::Config;
pub use error::{Error, Result};
pub use limits::ValidationError;
pub use matches::{Match, SearchStats};
pub use query::{ContentQuery, OpenRequest, TypeaheadQuery};
