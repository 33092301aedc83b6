use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Chunking policy applied to one side of a text pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Whole text as a single unit.
    Document,
    /// Blank-line (or newline) separated blocks.
    Paragraph,
    /// Individual sentences.
    Sentence,
    /// Overlapping windows of two consecutive sentences.
    TwoSentences,
    /// Sentences followed by paragraphs.
    Mixed,
}

impl Granularity {
    /// Token used in granularity strings and cache file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Document => "document",
            Granularity::Paragraph => "paragraph",
            Granularity::Sentence => "sentence",
            Granularity::TwoSentences => "2sents",
            Granularity::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(Granularity::Document),
            "paragraph" => Ok(Granularity::Paragraph),
            "sentence" => Ok(Granularity::Sentence),
            "2sents" => Ok(Granularity::TwoSentences),
            "mixed" => Ok(Granularity::Mixed),
            _ => Err(ConfigError::InvalidGranularity {
                value: s.to_string(),
            }),
        }
    }
}

/// Granularity for the source document and for the generated summary.
///
/// Parsed from `"mode"` (both sides) or `"docmode-genmode"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GranularityPair {
    /// Policy for the source document.
    pub document: Granularity,
    /// Policy for the generated text.
    pub generated: Granularity,
    single: bool,
}

impl GranularityPair {
    /// Same policy on both sides.
    pub fn uniform(granularity: Granularity) -> Self {
        Self {
            document: granularity,
            generated: granularity,
            single: true,
        }
    }

    /// Independent policies per side.
    pub fn split(document: Granularity, generated: Granularity) -> Self {
        Self {
            document,
            generated,
            single: false,
        }
    }
}

impl fmt::Display for GranularityPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.single {
            write!(f, "{}", self.document)
        } else {
            write!(f, "{}-{}", self.document, self.generated)
        }
    }
}

impl FromStr for GranularityPair {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidGranularity {
            value: s.to_string(),
        };

        let tokens: Vec<&str> = s.split('-').collect();
        match tokens.as_slice() {
            [single] => Ok(Self::uniform(single.parse().map_err(|_| invalid())?)),
            [doc, gen_] => Ok(Self::split(
                doc.parse().map_err(|_| invalid())?,
                gen_.parse().map_err(|_| invalid())?,
            )),
            _ => Err(invalid()),
        }
    }
}
