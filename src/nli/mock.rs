//! Deterministic predictor for tests and offline runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::NliPredictor;
use super::error::NliError;
use crate::constants::NLI_CLASSES;
use crate::hashing::hash_text_pair;

type ScriptFn = dyn Fn(&str, &str) -> [f32; NLI_CLASSES] + Send + Sync;

enum Behaviour {
    Hashed,
    Scripted(Box<ScriptFn>),
    Failing(String),
}

struct MockInner {
    behaviour: Behaviour,
    calls: AtomicUsize,
    pairs: AtomicUsize,
}

/// Predictor whose output depends only on the `(premise, hypothesis)` text.
///
/// Clones share call counters, so a test can keep a handle after boxing one
/// into an Imager.
#[derive(Clone)]
pub struct MockPredictor {
    inner: Arc<MockInner>,
}

impl std::fmt::Debug for MockPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPredictor")
            .field("calls", &self.calls())
            .field("pairs", &self.pairs_seen())
            .finish()
    }
}

impl MockPredictor {
    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            inner: Arc::new(MockInner {
                behaviour,
                calls: AtomicUsize::new(0),
                pairs: AtomicUsize::new(0),
            }),
        }
    }

    /// Softmax over logits derived from a BLAKE3 hash of the pair.
    pub fn hashed() -> Self {
        Self::with_behaviour(Behaviour::Hashed)
    }

    /// Uses `f` to produce the raw distribution for every pair.
    pub fn scripted<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> [f32; NLI_CLASSES] + Send + Sync + 'static,
    {
        Self::with_behaviour(Behaviour::Scripted(Box::new(f)))
    }

    /// Fails every call with [`NliError::InferenceFailed`].
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Failing(reason.into()))
    }

    /// Number of `predict` calls so far.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::Relaxed)
    }

    /// Number of pairs scored so far.
    pub fn pairs_seen(&self) -> usize {
        self.inner.pairs.load(Ordering::Relaxed)
    }

    fn hashed_distribution(premise: &str, hypothesis: &str) -> [f32; NLI_CLASSES] {
        let digest = hash_text_pair(premise, hypothesis);
        let logits: [f32; NLI_CLASSES] =
            std::array::from_fn(|i| f32::from(digest[i]) / 255.0 * 4.0 - 2.0);
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exp: [f32; NLI_CLASSES] = std::array::from_fn(|i| (logits[i] - max).exp());
        let total: f32 = exp.iter().sum();
        std::array::from_fn(|i| exp[i] / total)
    }
}

impl NliPredictor for MockPredictor {
    fn predict(&self, pairs: &[(&str, &str)]) -> Result<Vec<[f32; NLI_CLASSES]>, NliError> {
        self.inner.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.pairs.fetch_add(pairs.len(), Ordering::Relaxed);

        match &self.inner.behaviour {
            Behaviour::Hashed => Ok(pairs
                .iter()
                .map(|(p, h)| Self::hashed_distribution(p, h))
                .collect()),
            Behaviour::Scripted(f) => Ok(pairs.iter().map(|(p, h)| f(p, h)).collect()),
            Behaviour::Failing(reason) => Err(NliError::InferenceFailed {
                reason: reason.clone(),
            }),
        }
    }
}
