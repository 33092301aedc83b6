//! Text chunking into scoring units.
//!
//! Sentence boundary detection sits behind [`SentenceSplitter`]; the default
//! [`UnicodeSentenceSplitter`] follows UAX#29 sentence boundaries.

mod granularity;


pub use granularity::{Granularity, GranularityPair};

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::constants::MIN_UNIT_CHARS;

/// Splits raw text into sentences (unfiltered, in order).
pub trait SentenceSplitter: Send + Sync {
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// UAX#29 sentence segmentation with surrounding whitespace trimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSentenceSplitter;

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Splits documents into ordered units per a [`Granularity`].
#[derive(Clone)]
pub struct TextChunker {
    splitter: Arc<dyn SentenceSplitter>,
}

impl std::fmt::Debug for TextChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextChunker").finish_non_exhaustive()
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(Arc::new(UnicodeSentenceSplitter))
    }
}

impl TextChunker {
    pub fn new(splitter: Arc<dyn SentenceSplitter>) -> Self {
        Self { splitter }
    }

    pub fn split(&self, text: &str, granularity: Granularity) -> Vec<String> {
        match granularity {
            Granularity::Document => vec![text.to_string()],
            Granularity::Paragraph => self.paragraphs(text),
            Granularity::Sentence => self.sentences(text),
            Granularity::TwoSentences => self.two_sentence_windows(text),
            Granularity::Mixed => {
                let mut units = self.sentences(text);
                units.extend(self.paragraphs(text));
                units
            }
        }
    }

    fn sentences(&self, text: &str) -> Vec<String> {
        self.splitter
            .split_sentences(text)
            .into_iter()
            .filter(|s| is_long_enough(s))
            .map(str::to_string)
            .collect()
    }

    // One window per kept sentence; the last window holds a single sentence.
    fn two_sentence_windows(&self, text: &str) -> Vec<String> {
        let sentences = self.sentences(text);
        (0..sentences.len())
            .map(|i| sentences[i..(i + 2).min(sentences.len())].join(" "))
            .collect()
    }

    fn paragraphs(&self, text: &str) -> Vec<String> {
        let separator = if text.contains("\n\n") { "\n\n" } else { "\n" };
        text.split(separator)
            .map(str::trim)
            .filter(|p| is_long_enough(p))
            .map(str::to_string)
            .collect()
    }
}

#[inline]
fn is_long_enough(unit: &str) -> bool {
    unit.chars().count() > MIN_UNIT_CHARS
}
