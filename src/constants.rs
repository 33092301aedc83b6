//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.

/// Units with this many characters or fewer are dropped by the sentence and paragraph splitters.
pub const MIN_UNIT_CHARS: usize = 10;

/// Default cap on the number of source-document units per image.
pub const DEFAULT_MAX_DOC_UNITS: usize = 100;

/// Batch size used by the single-pair image path.
pub const DEFAULT_IMAGE_BATCH_SIZE: usize = 20;

/// Batch size used by the bulk image path.
pub const DEFAULT_BULK_BATCH_SIZE: usize = 128;

/// Max tokens per premise/hypothesis pair fed to the NLI encoder.
pub const MAX_INPUT_TOKENS: usize = 256;

/// Number of NLI classes (entailment, contradiction, neutral).
pub const NLI_CLASSES: usize = 3;

/// Fixed row count of a histogram matrix.
pub const DEFAULT_HISTOGRAM_ROWS: usize = 10;

/// Width of the per-document feature consumed by the final aggregator layer.
pub const AGGREGATE_FEATURE_WIDTH: usize = 3;

/// Number of output classes of the learned aggregator (not-consistent, consistent).
pub const AGGREGATOR_CLASSES: usize = 2;

/// Hand-tuned bin edges taken from the score distribution over a large summary corpus.
pub const PERCENTILE_BIN_EDGES: [f32; 24] = [
    0.0, 0.01, 0.02, 0.03, 0.04, 0.07, 0.13, 0.37, 0.90, 0.91, 0.92, 0.93, 0.94, 0.95, 0.955, 0.96,
    0.965, 0.97, 0.975, 0.98, 0.985, 0.99, 0.995, 1.0,
];

/// Tolerance used when checking that an image cell is a probability simplex.
pub const SIMPLEX_TOLERANCE: f32 = 1e-4;
