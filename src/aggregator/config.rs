use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::chunking::{Granularity, GranularityPair};
use crate::config::{Config, ConfigError, DEFAULT_CACHE_DIR};
use crate::constants::{AGGREGATE_FEATURE_WIDTH, DEFAULT_HISTOGRAM_ROWS, DEFAULT_MAX_DOC_UNITS};
use crate::histogram::{BinEdges, LabelSelection};
use crate::imager::ImagerConfig;
use crate::nli::ModelSpec;

/// Reduction of per-row responses to the final feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    #[default]
    Mean,
    Min,
    Max,
    /// `[min, mean, max]`
    All,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::All => "all",
        }
    }

    /// Feature for `responses`; empty input yields zeros.
    pub fn features(&self, responses: &[f32]) -> [f32; AGGREGATE_FEATURE_WIDTH] {
        if responses.is_empty() {
            return [0.0; AGGREGATE_FEATURE_WIDTH];
        }

        let min = responses.iter().copied().fold(f32::INFINITY, f32::min);
        let max = responses.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = responses.iter().sum::<f32>() / responses.len() as f32;

        match self {
            Aggregation::Mean => [mean; AGGREGATE_FEATURE_WIDTH],
            Aggregation::Min => [min; AGGREGATE_FEATURE_WIDTH],
            Aggregation::Max => [max; AGGREGATE_FEATURE_WIDTH],
            Aggregation::All => [min, mean, max],
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mean" => Ok(Aggregation::Mean),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            "all" => Ok(Aggregation::All),
            _ => Err(ConfigError::InvalidAggregation {
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration of a [`LearnedAggregator`](super::LearnedAggregator).
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// One Imager per model; image planes are stacked in this order.
    pub models: Vec<ModelSpec>,
    pub granularity: GranularityPair,
    pub bins: BinEdges,
    pub nli_labels: LabelSelection,
    pub agg: Aggregation,
    /// Histogram rows per document (generated units kept).
    pub n_rows: usize,
    /// Safetensors checkpoint for the two linear layers.
    pub start_file: Option<PathBuf>,
    /// Merge each Imager's persisted cache at construction.
    pub load_cache: bool,
    pub use_cache: bool,
    pub max_doc_units: usize,
    pub cache_dir: PathBuf,
    /// Root directory holding one sub-directory of weights per model name.
    pub model_dir: Option<PathBuf>,
}

impl AggregatorConfig {
    /// Resolves `models` with defaults: sentence granularity, `even50` bins,
    /// entailment only, mean aggregation, no checkpoint.
    pub fn new<S: AsRef<str>>(models: &[S]) -> Result<Self, ConfigError> {
        if models.is_empty() {
            return Err(ConfigError::EmptyModelList);
        }
        let models = models
            .iter()
            .map(|name| ModelSpec::resolve(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            models,
            granularity: GranularityPair::uniform(Granularity::Sentence),
            bins: BinEdges::even(50)?,
            nli_labels: LabelSelection::default(),
            agg: Aggregation::Mean,
            n_rows: DEFAULT_HISTOGRAM_ROWS,
            start_file: None,
            load_cache: false,
            use_cache: true,
            max_doc_units: DEFAULT_MAX_DOC_UNITS,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            model_dir: None,
        })
    }

    /// Like [`AggregatorConfig::new`], with paths and limits from `config`.
    pub fn from_config<S: AsRef<str>>(models: &[S], config: &Config) -> Result<Self, ConfigError> {
        let mut aggregator_config = Self::new(models)?;
        aggregator_config.use_cache = config.use_cache;
        aggregator_config.max_doc_units = config.max_doc_units;
        aggregator_config.cache_dir = config.cache_dir.clone();
        aggregator_config.model_dir = config.model_dir.clone();
        Ok(aggregator_config)
    }

    pub fn with_granularity(mut self, granularity: GranularityPair) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_bins(mut self, bins: BinEdges) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_labels(mut self, nli_labels: LabelSelection) -> Self {
        self.nli_labels = nli_labels;
        self
    }

    pub fn with_aggregation(mut self, agg: Aggregation) -> Self {
        self.agg = agg;
        self
    }

    pub fn with_rows(mut self, n_rows: usize) -> Self {
        self.n_rows = n_rows;
        self
    }

    pub fn with_start_file<P: Into<PathBuf>>(mut self, start_file: P) -> Self {
        self.start_file = Some(start_file.into());
        self
    }

    pub fn with_load_cache(mut self, load_cache: bool) -> Self {
        self.load_cache = load_cache;
        self
    }

    pub fn with_cache_dir<P: Into<PathBuf>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::EmptyModelList);
        }
        if self.n_rows == 0 {
            return Err(ConfigError::ZeroSize { name: "n_rows" });
        }
        Ok(())
    }

    /// Input width of the per-row layer: `models × labels × bins`.
    pub fn full_size(&self) -> usize {
        self.models.len() * self.nli_labels.len() * self.bins.n_bins()
    }

    /// Imager configuration for one of the configured models.
    pub fn imager_config(&self, model: &ModelSpec) -> ImagerConfig {
        let mut config = ImagerConfig::for_model(model.clone(), self.granularity)
            .with_cache(self.use_cache)
            .with_max_doc_units(self.max_doc_units)
            .with_cache_dir(self.cache_dir.clone());
        if let Some(root) = &self.model_dir {
            config = config.with_model_path(root.join(model.name()));
        }
        config
    }
}
