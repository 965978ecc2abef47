//! Error types for the scene archive.

use thiserror::Error;

/// Errors produced by archive queries and compositing.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("no archive coverage: {0}")]
    DataUnavailable(String),

    #[error("invalid catalog index: {0}")]
    Index(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("core error: {0}")]
    Core(#[from] terraclass_core::Error),
}

/// Result alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
