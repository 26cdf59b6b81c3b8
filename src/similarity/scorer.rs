// Scores all four dimensions for one pair of feature sets.

use serde::{Deserialize, Serialize};
use tracing::Span;

use super::dimensions::{code_similarity, command_similarity, structure_similarity};
use super::text::TextSimilarity;
use crate::config::TextSettings;
use crate::features::FeatureSet;

/// Per-dimension scores for one pair, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub text: f64,
    pub code: f64,
    pub command: f64,
    pub structure: f64,
}

/// Holds the text strategy; the other three dimensions are stateless.
pub struct SimilarityScorer {
    text: TextSimilarity,
}

impl SimilarityScorer {
    pub fn new(text: TextSimilarity) -> Self {
        Self { text }
    }

    pub fn from_settings(settings: &TextSettings) -> Self {
        Self::new(TextSimilarity::from_settings(settings))
    }

    pub fn with_span(self, span: Span) -> Self {
        Self {
            text: self.text.with_span(span),
        }
    }

    pub fn text_similarity(&self, a: &str, b: &str) -> f64 {
        self.text.score(a, b)
    }

    pub fn score(&self, a: &FeatureSet, b: &FeatureSet) -> DimensionScores {
        DimensionScores {
            text: self.text.score(&a.normalized_text, &b.normalized_text),
            code: code_similarity(&a.code_blocks, &b.code_blocks),
            command: command_similarity(&a.commands, &b.commands),
            structure: structure_similarity(&a.structure, &b.structure),
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::from_settings(&TextSettings::default())
    }
}
