//! The two linear layers of the learned aggregator.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder, VarMap};
use tracing::info;

use super::error::{AggregatorError, AggregatorResult};
use crate::constants::{AGGREGATE_FEATURE_WIDTH, AGGREGATOR_CLASSES};

const MLP_PREFIX: &str = "mlp";
const FINAL_PREFIX: &str = "layer_final";

/// `mlp: full_size → 1` applied per histogram row, then
/// `layer_final: 3 → 2` over the aggregated feature.
#[derive(Debug, Clone)]
pub struct ConvHead {
    mlp: Linear,
    layer_final: Linear,
    full_size: usize,
}

impl ConvHead {
    /// Randomly initialized layers.
    pub fn new(full_size: usize, device: &Device) -> AggregatorResult<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        Ok(Self {
            mlp: candle_nn::linear(full_size, 1, vb.pp(MLP_PREFIX))?,
            layer_final: candle_nn::linear(
                AGGREGATE_FEATURE_WIDTH,
                AGGREGATOR_CLASSES,
                vb.pp(FINAL_PREFIX),
            )?,
            full_size,
        })
    }

    /// Loads `mlp.*` and `layer_final.*` from a safetensors checkpoint.
    pub fn load(path: &Path, full_size: usize, device: &Device) -> AggregatorResult<Self> {
        let checkpoint_error = |e: candle_core::Error| AggregatorError::Checkpoint {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        if !path.is_file() {
            return Err(AggregatorError::Checkpoint {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        // SAFETY: the checkpoint is treated as read-only for the lifetime of the mapping.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device) }
            .map_err(checkpoint_error)?;

        let mlp = candle_nn::linear(full_size, 1, vb.pp(MLP_PREFIX)).map_err(checkpoint_error)?;
        let layer_final = candle_nn::linear(
            AGGREGATE_FEATURE_WIDTH,
            AGGREGATOR_CLASSES,
            vb.pp(FINAL_PREFIX),
        )
        .map_err(checkpoint_error)?;

        info!(path = %path.display(), full_size, "Loaded aggregator checkpoint");

        Ok(Self {
            mlp,
            layer_final,
            full_size,
        })
    }

    /// Builds the layers from explicit parameters.
    pub fn from_parameters(
        mlp_weight: &[f32],
        mlp_bias: f32,
        final_weight: [[f32; AGGREGATE_FEATURE_WIDTH]; AGGREGATOR_CLASSES],
        final_bias: [f32; AGGREGATOR_CLASSES],
        device: &Device,
    ) -> AggregatorResult<Self> {
        let full_size = mlp_weight.len();
        let mlp = Linear::new(
            Tensor::from_slice(mlp_weight, (1, full_size), device)?,
            Some(Tensor::from_slice(&[mlp_bias], 1, device)?),
        );
        let layer_final = Linear::new(
            Tensor::from_iter(final_weight.into_iter().flatten(), device)?
                .reshape((AGGREGATOR_CLASSES, AGGREGATE_FEATURE_WIDTH))?,
            Some(Tensor::from_slice(&final_bias, AGGREGATOR_CLASSES, device)?),
        );

        Ok(Self {
            mlp,
            layer_final,
            full_size,
        })
    }

    pub fn full_size(&self) -> usize {
        self.full_size
    }

    /// `(batch, n_rows, full_size)` histograms to `(batch, n_rows)` responses.
    pub fn row_responses(&self, histograms: &Tensor) -> AggregatorResult<Tensor> {
        Ok(self.mlp.forward(histograms)?.squeeze(2)?)
    }

    /// `(batch, 3)` features to `(batch, 2)` logits.
    pub fn classify(&self, features: &Tensor) -> AggregatorResult<Tensor> {
        Ok(self.layer_final.forward(features)?)
    }

    /// Writes both layers to a safetensors file.
    pub fn save(&self, path: &Path) -> AggregatorResult<()> {
        let mut tensors: HashMap<String, Tensor> = HashMap::new();
        for (prefix, layer) in [(MLP_PREFIX, &self.mlp), (FINAL_PREFIX, &self.layer_final)] {
            tensors.insert(format!("{prefix}.weight"), layer.weight().clone());
            if let Some(bias) = layer.bias() {
                tensors.insert(format!("{prefix}.bias"), bias.clone());
            }
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| AggregatorError::Checkpoint {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        candle_core::safetensors::save(&tensors, path)?;
        info!(path = %path.display(), "Saved aggregator checkpoint");
        Ok(())
    }
}
