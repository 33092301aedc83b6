use thiserror::Error;

#[derive(Debug, Error)]
pub enum NliError {
    #[error("failed to load NLI model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("{device} device unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("NLI inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("predictor returned {actual} distributions for {expected} pairs")]
    InvalidOutput { expected: usize, actual: usize },
}

impl From<candle_core::Error> for NliError {
    fn from(err: candle_core::Error) -> Self {
        NliError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for NliError {
    fn from(err: std::io::Error) -> Self {
        NliError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
