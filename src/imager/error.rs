use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::nli::NliError;

/// Errors returned by the persisted cache store.
#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store exists but is not a valid archive.
    #[error("corrupt cache store at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// One record is inconsistent; the whole load is rejected.
    #[error("corrupt cache record #{index}: {reason}")]
    CorruptEntry { index: usize, reason: String },

    #[error("unsupported cache store version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The store was written by an Imager with a different model or granularity.
    #[error("cache store belongs to '{found}', expected '{expected}'")]
    StoreMismatch { expected: String, found: String },
}

#[derive(Debug, Error)]
pub enum ImagerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("NLI predictor error: {0}")]
    Nli(#[from] NliError),

    #[error("cache store error: {0}")]
    Store(#[from] CacheStoreError),

    #[error("got {originals} originals but {generateds} generated texts")]
    LengthMismatch { originals: usize, generateds: usize },
}

pub type ImagerResult<T> = Result<T, ImagerError>;
