//! CLI command implementations

pub mod completions;
pub mod config;
pub mod find;
pub mod grep;
pub mod index;
pub mod search;
pub mod serve;
