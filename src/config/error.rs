//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Every string-typed option is parsed once at construction; an unrecognised
/// value surfaces here instead of falling back to a default.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Granularity token outside `document|paragraph|sentence|2sents|mixed`,
    /// or more than two tokens.
    #[error("unrecognized granularity '{value}'")]
    InvalidGranularity { value: String },

    /// Model name not present in the registry.
    #[error("unrecognized model name '{name}'")]
    UnknownModel { name: String },

    /// Label selection outside `e|c|n|ec|en|cn|ecn`.
    #[error("unrecognized nli_labels '{value}'")]
    InvalidNliLabels { value: String },

    /// Reduction outside `max|mean|min`.
    #[error("unrecognized {field} '{value}': expected one of max, mean, min")]
    InvalidReduction { field: &'static str, value: String },

    /// Bins mode outside `even<N>|percentile`.
    #[error("unrecognized bins mode '{value}': expected even<N> or percentile")]
    InvalidBins { value: String },

    /// Aggregation mode outside `mean|min|max|all`.
    #[error("unrecognized aggregation mode '{value}': expected mean, min, max or all")]
    InvalidAggregation { value: String },

    /// Zero-shot combination with neither entailment nor contradiction enabled.
    #[error("at least one of use_entailment / use_contradiction must be enabled")]
    NoSignalSelected,

    /// Learned aggregator configured without models.
    #[error("model list is empty")]
    EmptyModelList,

    /// A size parameter that must be positive was zero.
    #[error("{name} must be greater than zero")]
    ZeroSize { name: &'static str },

    /// Label index table for a model is not a permutation of the three classes.
    #[error("invalid label indices for '{model}': entailment={entailment}, contradiction={contradiction}")]
    InvalidLabelMap {
        model: String,
        entailment: usize,
        contradiction: usize,
    },

    /// Numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Boolean environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': expected true/false/1/0")]
    InvalidBool { name: &'static str, value: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
