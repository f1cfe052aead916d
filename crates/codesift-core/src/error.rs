//! Error types for Codesift Core

use std::path::PathBuf;

use thiserror::Error;

use crate::limits::ValidationError;

/// Result type alias using Codesift's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Codesift core error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Unknown config key: {0}")]
    UnknownConfigKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
