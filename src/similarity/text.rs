// Text similarity strategies.
//
// The vector-space strategy (TF-IDF + cosine) is preferred. When it cannot
// produce a vector comparison, for example because every token was filtered
// out, TextSimilarity switches to the sequence-matching strategy. Both
// strategies sit behind the same trait so either can be swapped or tested
// on its own.

use std::collections::HashSet;

use tracing::{debug, Span};

use super::segment::{JiebaSegmenter, Segmenter, Tokenizer};
use super::{sequence, tfidf};
use crate::config::TextSettings;
use crate::error::VectorizeError;

/// One way of scoring two prose strings.
pub trait TextStrategy: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Score two non-empty texts in [0, 1], or report why this strategy
    /// cannot handle them.
    fn score(&self, a: &str, b: &str) -> Result<f64, VectorizeError>;
}

/// TF-IDF vectors over the two texts, compared by cosine.
pub struct TfIdfCosine {
    tokenizer: Tokenizer,
}

impl TfIdfCosine {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }
}

impl TextStrategy for TfIdfCosine {
    fn name(&self) -> &'static str {
        "tfidf-cosine"
    }

    fn score(&self, a: &str, b: &str) -> Result<f64, VectorizeError> {
        let tokens_a = self.tokenizer.tokenize(a);
        let tokens_b = self.tokenizer.tokenize(b);
        let (va, vb) = tfidf::vectorize_pair(&tokens_a, &tokens_b)?;
        tfidf::cosine(&va, &vb)
    }
}

/// Longest-common-block ratio on the raw characters. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl TextStrategy for SequenceRatio {
    fn name(&self) -> &'static str {
        "sequence-ratio"
    }

    fn score(&self, a: &str, b: &str) -> Result<f64, VectorizeError> {
        Ok(sequence::ratio(a, b))
    }
}

/// Primary strategy with an infallible fallback.
pub struct TextSimilarity {
    primary: Box<dyn TextStrategy>,
    fallback: SequenceRatio,
    span: Span,
}

impl TextSimilarity {
    pub fn new(primary: Box<dyn TextStrategy>) -> Self {
        Self {
            primary,
            fallback: SequenceRatio,
            span: Span::none(),
        }
    }

    /// Build the default TF-IDF strategy from text settings.
    pub fn from_settings(settings: &TextSettings) -> Self {
        Self::with_segmenter(settings, Box::new(JiebaSegmenter))
    }

    pub fn with_segmenter(settings: &TextSettings, segmenter: Box<dyn Segmenter>) -> Self {
        let stop_words: HashSet<String> = settings.stop_word_set();
        let tokenizer = Tokenizer::new(segmenter, stop_words, settings.min_token_chars);
        Self::new(Box::new(TfIdfCosine::new(tokenizer)))
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Score two prose strings. Either side empty scores 0.0.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0.0;
        }
        match self.primary.score(a, b) {
            Ok(score) => score,
            Err(reason) => {
                debug!(
                    parent: &self.span,
                    strategy = self.primary.name(),
                    fallback = self.fallback.name(),
                    %reason,
                    "Text vectorization degenerated, using fallback"
                );
                self.fallback.score(a, b).unwrap_or(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::segment::WhitespaceSegmenter;

    fn plain_settings() -> TextSettings {
        TextSettings {
            stop_words: vec!["the".to_string()],
            english_stop_words: false,
            min_token_chars: 2,
        }
    }

    #[test]
    fn test_identical_text() {
        let sim = TextSimilarity::from_settings(&TextSettings::default());
        let text = "Configure the logical volume and extend the filesystem";
        assert!((sim.score(text, text) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let sim = TextSimilarity::from_settings(&TextSettings::default());
        assert_eq!(sim.score("", "some words"), 0.0);
        assert_eq!(sim.score("some words", "   "), 0.0);
    }

    #[test]
    fn test_falls_back_when_everything_is_filtered() {
        let sim = TextSimilarity::with_segmenter(&plain_settings(), Box::new(WhitespaceSegmenter));
        // Only stop words and single characters: the vocabulary is empty.
        let score = sim.score("the a", "the b");
        assert!((score - sequence::ratio("the a", "the b")).abs() < 1e-12);
        assert!(score > 0.0);
    }

    #[test]
    fn test_one_side_filtered_away_falls_back() {
        let sim = TextSimilarity::with_segmenter(&plain_settings(), Box::new(WhitespaceSegmenter));
        // "the a" keeps no terms, so its vector has zero norm.
        let score = sim.score("the a", "the volume");
        assert!((score - sequence::ratio("the a", "the volume")).abs() < 1e-12);
        assert!(score > 0.0);
    }

    #[test]
    fn test_symmetric() {
        let sim = TextSimilarity::from_settings(&TextSettings::default());
        let a = "Partition the disk with fdisk and create a volume group";
        let b = "Create users and groups then grant sudo rights to the group";
        assert_eq!(sim.score(a, b), sim.score(b, a));
    }
}
