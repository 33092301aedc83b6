//! NLI-based factual consistency scoring for generated summaries.
//!
//! A source document and a generated text are chunked into units, every
//! `(document unit, generated unit)` pair is scored by an NLI model, and the
//! resulting probability cube (an [`Image`]) is collapsed into one consistency
//! score.
//!
//! # Pipeline
//!
//! - [`TextChunker`] splits text at a [`Granularity`].
//! - [`Imager`] builds and caches 3 × N × M images through an [`NliPredictor`].
//! - [`ZeroShotScorer`] reduces an image with fixed reductions.
//! - [`HistogramBinner`] + [`LearnedAggregator`] bin image columns and score
//!   them with two small linear layers.
//!
//! # Configuration
//! - [`Config`] reads `CONSISTENCY_*` environment variables.
//! - [`ImagerConfig`], [`ZeroShotConfig`], [`AggregatorConfig`] are validated
//!   at construction; string options parse into closed enums.
//!
//! ## Test/Mock Support
//! [`MockPredictor`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregator;
pub mod chunking;
pub mod config;
pub mod constants;
pub mod hashing;
pub mod histogram;
pub mod image;
pub mod imager;
pub mod nli;
pub mod scoring;

pub use aggregator::{
    Aggregation, AggregatorConfig, AggregatorError, AggregatorOutput, AggregatorResult, ConvHead,
    LearnedAggregator,
};
pub use chunking::{Granularity, GranularityPair, SentenceSplitter, TextChunker, UnicodeSentenceSplitter};
pub use config::{Config, ConfigError};
pub use hashing::hash_text_pair;
pub use histogram::{BinEdges, HistogramBinner, HistogramMatrix, LabelSelection};
pub use image::{Image, ImageError};
pub use imager::{
    CacheStore, CacheStoreError, ImageCache, Imager, ImagerConfig, ImagerError, ImagerResult,
};
#[cfg(any(test, feature = "mock"))]
pub use nli::MockPredictor;
pub use nli::{CandleNliPredictor, LabelMap, ModelSpec, NliError, NliLabel, NliPredictor};
pub use scoring::{
    Combination, Reduction, ScoredPair, ScoringError, ZeroShotConfig, ZeroShotOutput,
    ZeroShotScorer,
};
