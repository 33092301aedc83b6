use thiserror::Error;

use crate::config::ConfigError;
use crate::imager::ImagerError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("imager error: {0}")]
    Imager(#[from] ImagerError),
}
