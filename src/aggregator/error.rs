use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::image::ImageError;
use crate::imager::ImagerError;
use crate::nli::NliError;

#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("imager error: {0}")]
    Imager(#[from] ImagerError),

    #[error("image error: {0}")]
    Image(#[from] ImageError),

    #[error("device error: {0}")]
    Device(#[from] NliError),

    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("failed to load checkpoint {path}: {reason}")]
    Checkpoint { path: PathBuf, reason: String },

    #[error("expected {expected} predictors (one per model), got {actual}")]
    PredictorCount { expected: usize, actual: usize },

    #[error("{originals} originals but {generateds} generated texts")]
    LengthMismatch { originals: usize, generateds: usize },

    #[error("histogram width {actual} does not match layer input {expected}")]
    FeatureWidth { expected: usize, actual: usize },
}

pub type AggregatorResult<T> = Result<T, AggregatorError>;
