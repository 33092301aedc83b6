//! Zero-shot consistency scoring.
//!
//! [`ZeroShotScorer`] turns an NLI image into one scalar without any learned
//! parameters: `op1` collapses each generated unit's column of the entailment
//! and contradiction planes, the [`Combination`] mixes the two signals, and
//! `op2` collapses the per-unit vector.
//!
//! For the degenerate image (no unit pair to score) the result is `0.0` under
//! [`Combination::Both`].

pub mod config;
pub mod error;
pub mod scorer;
pub mod types;


pub use config::ZeroShotConfig;
pub use error::ScoringError;
pub use scorer::ZeroShotScorer;
pub use types::{Combination, Reduction, ScoredPair, ZeroShotOutput};
