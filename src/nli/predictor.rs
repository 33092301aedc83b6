use std::path::{Path, PathBuf};

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::bert::NliClassifier;
use super::device::select_device;
use super::error::NliError;
use super::utils::load_pair_tokenizer;
use super::NliPredictor;
use crate::constants::{MAX_INPUT_TOKENS, NLI_CLASSES};

/// Batched NLI predictor backed by a candle encoder loaded from safetensors.
///
/// The model directory must contain `config.json`, `model.safetensors` and
/// `tokenizer.json`.
pub struct CandleNliPredictor {
    device: Device,
    model_dir: PathBuf,
    model: NliClassifier,
    tokenizer: Tokenizer,
}

impl std::fmt::Debug for CandleNliPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandleNliPredictor")
            .field("device", &format!("{:?}", self.device))
            .field("model_dir", &self.model_dir)
            .finish()
    }
}

impl CandleNliPredictor {
    pub fn load(model_dir: &Path) -> Result<Self, NliError> {
        if !model_dir.exists() {
            return Err(NliError::ModelLoadFailed {
                reason: format!("NLI model path not found: {}", model_dir.display()),
            });
        }

        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_dir.join(required).exists() {
                return Err(NliError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", required, model_dir.display()),
                });
            }
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for NLI predictor");

        info!(model_dir = %model_dir.display(), "Loading NLI model");

        let model =
            NliClassifier::load(model_dir, &device).map_err(|e| NliError::ModelLoadFailed {
                reason: format!("Failed to load NLI model: {}", e),
            })?;

        let tokenizer = load_pair_tokenizer(model_dir, MAX_INPUT_TOKENS).map_err(|e| {
            NliError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!(model_dir = %model_dir.display(), "NLI model loaded successfully");

        Ok(Self {
            device,
            model_dir: model_dir.to_path_buf(),
            model,
            tokenizer,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn batch_tensor(&self, rows: Vec<&[u32]>, seq_len: usize) -> Result<Tensor, NliError> {
        let batch = rows.len();
        let flat: Vec<u32> = rows.into_iter().flatten().copied().collect();
        Ok(Tensor::from_vec(flat, (batch, seq_len), &self.device)?)
    }
}

impl NliPredictor for CandleNliPredictor {
    fn predict(&self, pairs: &[(&str, &str)]) -> Result<Vec<[f32; NLI_CLASSES]>, NliError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(pairs.to_vec(), true)
            .map_err(|e| NliError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let seq_len = encodings.first().map_or(0, |e| e.len());
        debug!(batch = pairs.len(), seq_len, "Running NLI batch");

        let input_ids = self.batch_tensor(encodings.iter().map(|e| e.get_ids()).collect(), seq_len)?;
        let type_ids =
            self.batch_tensor(encodings.iter().map(|e| e.get_type_ids()).collect(), seq_len)?;
        let attention_mask = self.batch_tensor(
            encodings.iter().map(|e| e.get_attention_mask()).collect(),
            seq_len,
        )?;

        let logits = self
            .model
            .forward(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| NliError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let probs = candle_nn::ops::softmax_last_dim(&logits)?.to_vec2::<f32>()?;

        if probs.len() != pairs.len() {
            return Err(NliError::InvalidOutput {
                expected: pairs.len(),
                actual: probs.len(),
            });
        }

        probs
            .into_iter()
            .map(|row| {
                <[f32; NLI_CLASSES]>::try_from(row.as_slice()).map_err(|_| {
                    NliError::InferenceFailed {
                        reason: format!("expected {NLI_CLASSES} classes, got {}", row.len()),
                    }
                })
            })
            .collect()
    }
}
