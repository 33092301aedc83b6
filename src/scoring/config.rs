use crate::config::{Config, ConfigError};
use crate::imager::ImagerConfig;

use super::types::{Combination, Reduction};

/// Configuration of a [`ZeroShotScorer`](super::ZeroShotScorer).
#[derive(Debug, Clone)]
pub struct ZeroShotConfig {
    pub imager: ImagerConfig,
    /// Reduction over document units, per generated unit.
    pub op1: Reduction,
    /// Reduction over generated units.
    pub op2: Reduction,
    pub combination: Combination,
    /// Merge the persisted image cache at construction.
    pub load_cache: bool,
}

impl ZeroShotConfig {
    /// `op1=max`, `op2=mean`, both signals, cache loaded at construction.
    pub fn new(model: &str, granularity: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_imager(ImagerConfig::new(model, granularity)?))
    }

    /// Like [`ZeroShotConfig::new`], with paths and limits from `config`.
    pub fn from_config(model: &str, granularity: &str, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::with_imager(ImagerConfig::from_config(
            model,
            granularity,
            config,
        )?))
    }

    pub fn with_imager(imager: ImagerConfig) -> Self {
        Self {
            imager,
            op1: Reduction::Max,
            op2: Reduction::Mean,
            combination: Combination::Both,
            load_cache: true,
        }
    }

    /// Parses `op1` and `op2` from their string names.
    pub fn with_ops(mut self, op1: &str, op2: &str) -> Result<Self, ConfigError> {
        self.op1 = Reduction::parse_field("op1", op1)?;
        self.op2 = Reduction::parse_field("op2", op2)?;
        Ok(self)
    }

    pub fn with_signals(
        mut self,
        use_entailment: bool,
        use_contradiction: bool,
    ) -> Result<Self, ConfigError> {
        self.combination = Combination::from_flags(use_entailment, use_contradiction)?;
        Ok(self)
    }

    pub fn with_load_cache(mut self, load_cache: bool) -> Self {
        self.load_cache = load_cache;
        self
    }
}
