use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::nli::NliLabel;

/// Subset of NLI labels histogrammed per model, in canonical `e`, `c`, `n` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSelection {
    entailment: bool,
    contradiction: bool,
    neutral: bool,
}

impl LabelSelection {
    pub fn contains(&self, label: NliLabel) -> bool {
        match label {
            NliLabel::Entailment => self.entailment,
            NliLabel::Contradiction => self.contradiction,
            NliLabel::Neutral => self.neutral,
        }
    }

    /// Selected labels in plane order.
    pub fn labels(&self) -> impl Iterator<Item = NliLabel> + '_ {
        NliLabel::ALL
            .into_iter()
            .filter(move |label| self.contains(*label))
    }

    pub fn len(&self) -> usize {
        self.labels().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if image plane `plane` carries a selected label.
    pub fn selects_plane(&self, plane: usize) -> bool {
        self.contains(NliLabel::of_plane(plane))
    }
}

impl Default for LabelSelection {
    fn default() -> Self {
        Self {
            entailment: true,
            contradiction: false,
            neutral: false,
        }
    }
}

impl fmt::Display for LabelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in self.labels() {
            write!(f, "{}", label.code())?;
        }
        Ok(())
    }
}

impl FromStr for LabelSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (entailment, contradiction, neutral) = match s.trim() {
            "e" => (true, false, false),
            "c" => (false, true, false),
            "n" => (false, false, true),
            "ec" => (true, true, false),
            "en" => (true, false, true),
            "cn" => (false, true, true),
            "ecn" => (true, true, true),
            _ => {
                return Err(ConfigError::InvalidNliLabels {
                    value: s.to_string(),
                });
            }
        };
        Ok(Self {
            entailment,
            contradiction,
            neutral,
        })
    }
}
