use std::path::PathBuf;

use crate::chunking::GranularityPair;
use crate::config::{Config, ConfigError, DEFAULT_CACHE_DIR};
use crate::constants::{DEFAULT_IMAGE_BATCH_SIZE, DEFAULT_MAX_DOC_UNITS};
use crate::nli::ModelSpec;

/// Resolved configuration for one [`Imager`](super::Imager).
#[derive(Debug, Clone)]
pub struct ImagerConfig {
    /// Registered model and its label layout.
    pub model: ModelSpec,
    /// Chunking policy for the document and generated sides.
    pub granularity: GranularityPair,
    /// Keep computed images in memory (and allow persisting them).
    pub use_cache: bool,
    /// Cap on source-document units per image.
    pub max_doc_units: usize,
    /// Pairs per predictor call on the single-pair path.
    pub batch_size: usize,
    /// Directory holding persisted caches.
    pub cache_dir: PathBuf,
    /// Directory with the model weights; required by [`Imager::load`](super::Imager::load).
    pub model_path: Option<PathBuf>,
}

impl ImagerConfig {
    /// Parses a model name and granularity string with default settings.
    pub fn new(model: &str, granularity: &str) -> Result<Self, ConfigError> {
        Ok(Self::for_model(
            ModelSpec::resolve(model)?,
            granularity.parse()?,
        ))
    }

    /// Default settings for an already-resolved model and granularity.
    pub fn for_model(model: ModelSpec, granularity: GranularityPair) -> Self {
        Self {
            model,
            granularity,
            use_cache: true,
            max_doc_units: DEFAULT_MAX_DOC_UNITS,
            batch_size: DEFAULT_IMAGE_BATCH_SIZE,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            model_path: None,
        }
    }

    /// Parses a model name and granularity, taking paths and limits from `config`.
    pub fn from_config(model: &str, granularity: &str, config: &Config) -> Result<Self, ConfigError> {
        let mut imager_config = Self::new(model, granularity)?;
        imager_config.use_cache = config.use_cache;
        imager_config.max_doc_units = config.max_doc_units;
        imager_config.cache_dir = config.cache_dir.clone();
        imager_config.model_path = config.model_path(model);
        Ok(imager_config)
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_max_doc_units(mut self, max_doc_units: usize) -> Self {
        self.max_doc_units = max_doc_units;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_cache_dir<P: Into<PathBuf>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_model_path<P: Into<PathBuf>>(mut self, model_path: P) -> Self {
        self.model_path = Some(model_path.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroSize { name: "batch_size" });
        }
        if self.max_doc_units == 0 {
            return Err(ConfigError::ZeroSize {
                name: "max_doc_units",
            });
        }
        Ok(())
    }

    /// Identifies the cache scope: model name plus granularity string.
    pub fn cache_scope(&self) -> String {
        format!("{}_{}", self.model.name(), self.granularity)
    }

    /// Location of the persisted cache for this model and granularity.
    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir
            .join(format!("cache_{}.rkyv", self.cache_scope()))
    }
}
