use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::constants::NLI_CLASSES;

/// One of the three NLI classes, in image-plane order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NliLabel {
    Entailment = 0,
    Contradiction = 1,
    Neutral = 2,
}

impl NliLabel {
    pub const ALL: [NliLabel; NLI_CLASSES] = [
        NliLabel::Entailment,
        NliLabel::Contradiction,
        NliLabel::Neutral,
    ];

    /// Image plane index for this label.
    #[inline]
    pub fn plane(self) -> usize {
        self as usize
    }

    /// Single-letter code used in label selection strings.
    pub fn code(self) -> char {
        match self {
            NliLabel::Entailment => 'e',
            NliLabel::Contradiction => 'c',
            NliLabel::Neutral => 'n',
        }
    }

    /// Label for a plane of a (possibly multi-model) stacked image.
    #[inline]
    pub fn of_plane(plane: usize) -> NliLabel {
        Self::ALL[plane % NLI_CLASSES]
    }
}

/// Where each NLI class lives in a predictor's output distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMap {
    entailment: usize,
    contradiction: usize,
    neutral: usize,
}

impl LabelMap {
    /// Builds a map from entailment and contradiction indices; neutral takes the remaining slot.
    pub fn new(model: &str, entailment: usize, contradiction: usize) -> Result<Self, ConfigError> {
        if entailment >= NLI_CLASSES || contradiction >= NLI_CLASSES || entailment == contradiction
        {
            return Err(ConfigError::InvalidLabelMap {
                model: model.to_string(),
                entailment,
                contradiction,
            });
        }
        let neutral = NLI_CLASSES * (NLI_CLASSES - 1) / 2 - entailment - contradiction;
        Ok(Self {
            entailment,
            contradiction,
            neutral,
        })
    }

    #[inline]
    pub fn index_of(&self, label: NliLabel) -> usize {
        match label {
            NliLabel::Entailment => self.entailment,
            NliLabel::Contradiction => self.contradiction,
            NliLabel::Neutral => self.neutral,
        }
    }

    /// Reorders a raw predictor distribution into `[entailment, contradiction, neutral]`.
    #[inline]
    pub fn reorder(&self, probs: &[f32; NLI_CLASSES]) -> [f32; NLI_CLASSES] {
        [
            probs[self.entailment],
            probs[self.contradiction],
            probs[self.neutral],
        ]
    }
}

struct RegistryEntry {
    name: &'static str,
    model_card: &'static str,
    entailment: usize,
    contradiction: usize,
}

const REGISTRY: &[RegistryEntry] = &[
    RegistryEntry {
        name: "snli-base",
        model_card: "boychaboy/SNLI_roberta-base",
        entailment: 0,
        contradiction: 2,
    },
    RegistryEntry {
        name: "snli-large",
        model_card: "boychaboy/SNLI_roberta-large",
        entailment: 0,
        contradiction: 2,
    },
    RegistryEntry {
        name: "mnli-base",
        model_card: "microsoft/deberta-base-mnli",
        entailment: 2,
        contradiction: 0,
    },
    RegistryEntry {
        name: "mnli",
        model_card: "roberta-large-mnli",
        entailment: 2,
        contradiction: 0,
    },
    RegistryEntry {
        name: "anli",
        model_card: "ynie/roberta-large-snli_mnli_fever_anli_R1_R2_R3-nli",
        entailment: 0,
        contradiction: 2,
    },
    RegistryEntry {
        name: "vitc-base",
        model_card: "tals/albert-base-vitaminc-mnli",
        entailment: 0,
        contradiction: 1,
    },
    RegistryEntry {
        name: "vitc",
        model_card: "tals/albert-xlarge-vitaminc-mnli",
        entailment: 0,
        contradiction: 1,
    },
    RegistryEntry {
        name: "vitc-only",
        model_card: "tals/albert-xlarge-vitaminc",
        entailment: 0,
        contradiction: 1,
    },
];

/// A registered NLI model: its short name, hub card, and output label layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    name: &'static str,
    model_card: &'static str,
    labels: LabelMap,
}

impl ModelSpec {
    /// Resolves a short model name. Raw hub cards are not accepted.
    pub fn resolve(name: &str) -> Result<Self, ConfigError> {
        let entry = REGISTRY
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ConfigError::UnknownModel {
                name: name.to_string(),
            })?;

        Ok(Self {
            name: entry.name,
            model_card: entry.model_card,
            labels: LabelMap::new(entry.name, entry.entailment, entry.contradiction)?,
        })
    }

    /// All registered model names.
    pub fn known_names() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|e| e.name)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn model_card(&self) -> &'static str {
        self.model_card
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.model_card)
    }
}

impl FromStr for ModelSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}
