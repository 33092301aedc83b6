use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::image::Image;

/// Reduction over a vector of probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    #[default]
    Max,
    Mean,
    Min,
}

impl Reduction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reduction::Max => "max",
            Reduction::Mean => "mean",
            Reduction::Min => "min",
        }
    }

    /// Parses `value`, naming `field` in the error.
    pub fn parse_field(field: &'static str, value: &str) -> Result<Self, ConfigError> {
        match value.trim() {
            "max" => Ok(Reduction::Max),
            "mean" => Ok(Reduction::Mean),
            "min" => Ok(Reduction::Min),
            _ => Err(ConfigError::InvalidReduction {
                field,
                value: value.to_string(),
            }),
        }
    }

    /// Reduces `values`; an empty input reduces to `0.0`.
    pub fn reduce<I>(self, values: I) -> f32
    where
        I: IntoIterator<Item = f32>,
    {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return 0.0;
        };

        match self {
            Reduction::Max => iter.fold(first, f32::max),
            Reduction::Min => iter.fold(first, f32::min),
            Reduction::Mean => {
                let (sum, count) = iter.fold((first, 1usize), |(s, n), v| (s + v, n + 1));
                sum / count as f32
            }
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reduction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("reduction", s)
    }
}

/// Which NLI signals feed the per-unit zero-shot score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combination {
    /// `entailment - contradiction`
    #[default]
    Both,
    /// `entailment`
    EntailmentOnly,
    /// `1 - contradiction`
    ContradictionOnly,
}

impl Combination {
    pub fn from_flags(use_entailment: bool, use_contradiction: bool) -> Result<Self, ConfigError> {
        match (use_entailment, use_contradiction) {
            (true, true) => Ok(Combination::Both),
            (true, false) => Ok(Combination::EntailmentOnly),
            (false, true) => Ok(Combination::ContradictionOnly),
            (false, false) => Err(ConfigError::NoSignalSelected),
        }
    }

    #[inline]
    pub fn combine(&self, entailment: f32, contradiction: f32) -> f32 {
        match self {
            Combination::Both => entailment - contradiction,
            Combination::EntailmentOnly => entailment,
            Combination::ContradictionOnly => 1.0 - contradiction,
        }
    }
}

/// Image and score for one document pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPair {
    pub image: Image,
    pub score: f32,
}

/// Scores and images of a bulk call, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZeroShotOutput {
    pub scores: Vec<f32>,
    pub images: Vec<Image>,
}
