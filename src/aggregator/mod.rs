//! Learned aggregation over histogram features.
//!
//! A [`LearnedAggregator`] holds one [`Imager`] per configured model. For each
//! document pair the per-model images are stacked along the plane axis and
//! binned into a fixed `n_rows × full_size` [`HistogramMatrix`]. The `mlp`
//! layer maps every row to one response; the responses of the real rows
//! (non-zero histograms) are reduced by the configured [`Aggregation`] into a
//! 3-element feature, which `layer_final` maps to `(not consistent, consistent)`
//! logits.
//!
//! Documents without a real row get the feature `[0, 0, 0]`.

mod config;
mod error;
mod head;


pub use config::{Aggregation, AggregatorConfig};
pub use error::{AggregatorError, AggregatorResult};
pub use head::ConvHead;

use candle_core::{DType, Device, Tensor};
use tracing::{debug, info};

use crate::constants::{AGGREGATE_FEATURE_WIDTH, AGGREGATOR_CLASSES};
use crate::histogram::{HistogramBinner, HistogramMatrix};
use crate::image::Image;
use crate::imager::Imager;
use crate::nli::NliPredictor;
use crate::nli::device::select_device;

/// Output of [`LearnedAggregator::forward`].
#[derive(Debug)]
pub struct AggregatorOutput {
    /// `(batch, 2)` logits.
    pub logits: Tensor,
    pub histograms: Vec<HistogramMatrix>,
    pub images: Vec<Image>,
}

pub struct LearnedAggregator {
    config: AggregatorConfig,
    imagers: Vec<Imager>,
    binner: HistogramBinner,
    head: ConvHead,
    device: Device,
}

impl std::fmt::Debug for LearnedAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnedAggregator")
            .field("models", &self.imagers.len())
            .field("bins", &self.config.bins.to_string())
            .field("nli_labels", &self.config.nli_labels.to_string())
            .field("agg", &self.config.agg)
            .field("full_size", &self.head.full_size())
            .finish()
    }
}

impl LearnedAggregator {
    /// Loads every configured NLI model from `config.model_dir`.
    pub fn load(config: AggregatorConfig) -> AggregatorResult<Self> {
        config.validate()?;
        let imagers = config
            .models
            .iter()
            .map(|model| Imager::load(config.imager_config(model)))
            .collect::<Result<Vec<_>, _>>()?;
        let device = select_device()?;
        Self::from_imagers(config, imagers, device)
    }

    /// Builds the aggregator around one predictor per configured model, on CPU.
    pub fn with_predictors(
        config: AggregatorConfig,
        predictors: Vec<Box<dyn NliPredictor>>,
    ) -> AggregatorResult<Self> {
        config.validate()?;
        if predictors.len() != config.models.len() {
            return Err(AggregatorError::PredictorCount {
                expected: config.models.len(),
                actual: predictors.len(),
            });
        }

        let imagers = config
            .models
            .iter()
            .zip(predictors)
            .map(|(model, predictor)| Imager::with_predictor(config.imager_config(model), predictor))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_imagers(config, imagers, Device::Cpu)
    }

    fn from_imagers(
        config: AggregatorConfig,
        mut imagers: Vec<Imager>,
        device: Device,
    ) -> AggregatorResult<Self> {
        if config.load_cache {
            for imager in &mut imagers {
                let loaded = imager.load_cache()?;
                debug!(model = imager.model().name(), loaded, "Merged persisted image cache");
            }
        }

        let full_size = config.full_size();
        let head = match &config.start_file {
            Some(path) => ConvHead::load(path, full_size, &device)?,
            None => ConvHead::new(full_size, &device)?,
        };

        let binner = HistogramBinner::new(config.bins.clone(), config.nli_labels)
            .with_rows(config.n_rows);

        info!(
            models = config.models.len(),
            granularity = %config.granularity,
            bins = %config.bins,
            nli_labels = %config.nli_labels,
            agg = %config.agg,
            full_size,
            "Learned aggregator ready"
        );

        Ok(Self {
            config,
            imagers,
            binner,
            head,
            device,
        })
    }

    /// Replaces the linear layers.
    pub fn with_head(mut self, head: ConvHead) -> AggregatorResult<Self> {
        if head.full_size() != self.config.full_size() {
            return Err(AggregatorError::FeatureWidth {
                expected: self.config.full_size(),
                actual: head.full_size(),
            });
        }
        self.head = head;
        Ok(self)
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn imagers(&self) -> &[Imager] {
        &self.imagers
    }

    pub fn head(&self) -> &ConvHead {
        &self.head
    }

    pub fn binner(&self) -> &HistogramBinner {
        &self.binner
    }

    /// Per-model images stacked along the plane axis, in model order.
    pub fn build_image(&mut self, original: &str, generated: &str) -> AggregatorResult<Image> {
        let images = self
            .imagers
            .iter_mut()
            .map(|imager| imager.build_image(original, generated))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Image::stack(&images)?)
    }

    pub fn compute_histogram(
        &mut self,
        original: &str,
        generated: &str,
    ) -> AggregatorResult<(Image, HistogramMatrix)> {
        let image = self.build_image(original, generated)?;
        let histogram = self.binner.compute(&image);
        Ok((image, histogram))
    }

    /// Runs the full pipeline. When `images` is given, the texts are not
    /// chunked and the precomputed stacked images are binned directly.
    pub fn forward<S: AsRef<str>>(
        &mut self,
        originals: &[S],
        generateds: &[S],
        images: Option<Vec<Image>>,
    ) -> AggregatorResult<AggregatorOutput> {
        let images = match images {
            Some(images) => images,
            None => {
                if originals.len() != generateds.len() {
                    return Err(AggregatorError::LengthMismatch {
                        originals: originals.len(),
                        generateds: generateds.len(),
                    });
                }
                originals
                    .iter()
                    .zip(generateds)
                    .map(|(o, g)| self.build_image(o.as_ref(), g.as_ref()))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        self.forward_images(images)
    }

    /// Bins and classifies already stacked images.
    pub fn forward_images(&self, images: Vec<Image>) -> AggregatorResult<AggregatorOutput> {
        let histograms: Vec<HistogramMatrix> =
            images.iter().map(|image| self.binner.compute(image)).collect();

        let full_size = self.head.full_size();
        if let Some(bad) = histograms.iter().find(|h| h.width() != full_size) {
            return Err(AggregatorError::FeatureWidth {
                expected: full_size,
                actual: bad.width(),
            });
        }

        let batch = histograms.len();
        if batch == 0 {
            return Ok(AggregatorOutput {
                logits: Tensor::zeros((0, AGGREGATOR_CLASSES), DType::F32, &self.device)?,
                histograms,
                images,
            });
        }

        let n_rows = self.binner.n_rows();
        debug!(batch, n_rows, full_size, "Aggregating histograms");

        let flat: Vec<f32> = histograms
            .iter()
            .flat_map(|h| h.as_slice().iter().copied())
            .collect();
        let input = Tensor::from_vec(flat, (batch, n_rows, full_size), &self.device)?;
        let responses = self.head.row_responses(&input)?.to_vec2::<f32>()?;

        let features: Vec<f32> = responses
            .iter()
            .zip(&histograms)
            .flat_map(|(response, histogram)| {
                let seq_len = histogram.effective_len();
                self.config.agg.features(&response[..seq_len])
            })
            .collect();

        let features = Tensor::from_vec(features, (batch, AGGREGATE_FEATURE_WIDTH), &self.device)?;
        let logits = self.head.classify(&features)?;

        Ok(AggregatorOutput {
            logits,
            histograms,
            images,
        })
    }

    /// Probability of the consistent class for each pair.
    pub fn score<S: AsRef<str>>(
        &mut self,
        originals: &[S],
        generateds: &[S],
    ) -> AggregatorResult<Vec<f32>> {
        let output = self.forward(originals, generateds, None)?;
        probabilities(&output.logits)
    }

    /// Persists every Imager's cache. Returns the total number of images written.
    pub fn save_imager_cache(&self) -> AggregatorResult<usize> {
        let mut written = 0;
        for imager in &self.imagers {
            written += imager.save_cache()?;
        }
        Ok(written)
    }

    pub fn save_checkpoint(&self, path: &std::path::Path) -> AggregatorResult<()> {
        self.head.save(path)
    }
}

/// Softmax over the class axis, second class.
pub fn probabilities(logits: &Tensor) -> AggregatorResult<Vec<f32>> {
    if logits.dim(0)? == 0 {
        return Ok(Vec::new());
    }
    let probs = candle_nn::ops::softmax_last_dim(logits)?;
    Ok(probs
        .to_vec2::<f32>()?
        .into_iter()
        .map(|row| row[1])
        .collect())
}
