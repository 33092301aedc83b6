//! NLI predictors and the model registry.
//!
//! - [`NliPredictor`] is the batched inference seam used by [`crate::imager`].
//! - [`CandleNliPredictor`] runs a local BERT or RoBERTa checkpoint with candle.
//! - [`ModelSpec`] resolves a short model name to its label layout.

/// Sequence-classification head over a BERT or RoBERTa encoder.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod predictor;
mod registry;
/// Tokenizer loading helpers.
pub mod utils;


pub use error::NliError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockPredictor;
pub use predictor::CandleNliPredictor;
pub use registry::{LabelMap, ModelSpec, NliLabel};

use crate::constants::NLI_CLASSES;

/// Batched premise/hypothesis inference.
///
/// Returns one probability distribution per input pair, in the same order, with
/// classes laid out in the predictor's own index order (see [`LabelMap`]).
/// Outputs for a pair must not depend on which other pairs share its batch.
pub trait NliPredictor: Send + Sync {
    fn predict(&self, pairs: &[(&str, &str)]) -> Result<Vec<[f32; NLI_CLASSES]>, NliError>;
}
