//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CONSISTENCY_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_BULK_BATCH_SIZE, DEFAULT_MAX_DOC_UNITS};

/// Runtime configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CONSISTENCY_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory with one sub-directory per model name.
    pub model_dir: Option<PathBuf>,

    /// Directory holding persisted image caches. Default: `./.cache/consistency`.
    pub cache_dir: PathBuf,

    /// Pairs per predictor call on the bulk path. Default: `128`.
    pub batch_size: usize,

    /// Cap on source-document units per image. Default: `100`.
    pub max_doc_units: usize,

    /// Whether Imagers keep (and load) a cache. Default: `true`.
    pub use_cache: bool,
}

/// Default cache directory used when `CONSISTENCY_CACHE_DIR` is not set.
pub const DEFAULT_CACHE_DIR: &str = "./.cache/consistency";

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: None,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            batch_size: DEFAULT_BULK_BATCH_SIZE,
            max_doc_units: DEFAULT_MAX_DOC_UNITS,
            use_cache: true,
        }
    }
}

impl Config {
    const ENV_MODEL_DIR: &'static str = "CONSISTENCY_MODEL_DIR";
    const ENV_CACHE_DIR: &'static str = "CONSISTENCY_CACHE_DIR";
    const ENV_BATCH_SIZE: &'static str = "CONSISTENCY_BATCH_SIZE";
    const ENV_MAX_DOC_UNITS: &'static str = "CONSISTENCY_MAX_DOC_UNITS";
    const ENV_USE_CACHE: &'static str = "CONSISTENCY_USE_CACHE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let cache_dir = Self::parse_path_from_env(Self::ENV_CACHE_DIR, defaults.cache_dir);
        let batch_size = Self::parse_usize_from_env(Self::ENV_BATCH_SIZE, defaults.batch_size)?;
        let max_doc_units =
            Self::parse_usize_from_env(Self::ENV_MAX_DOC_UNITS, defaults.max_doc_units)?;
        let use_cache = Self::parse_bool_from_env(Self::ENV_USE_CACHE, defaults.use_cache)?;

        Ok(Self {
            model_dir,
            cache_dir,
            batch_size,
            max_doc_units,
            use_cache,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroSize { name: "batch_size" });
        }
        if self.max_doc_units == 0 {
            return Err(ConfigError::ZeroSize {
                name: "max_doc_units",
            });
        }

        if self.cache_dir.exists() && !self.cache_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.cache_dir.clone(),
            });
        }

        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns the directory holding the weights for `model_name`, if a model root is set.
    pub fn model_path(&self, model_name: &str) -> Option<PathBuf> {
        self.model_dir.as_ref().map(|root| root.join(model_name))
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                _ => Err(ConfigError::InvalidBool {
                    name: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }
}
