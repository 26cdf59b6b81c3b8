use serde::{Deserialize, Serialize};

/// Overall scores at or above this are high similarity.
pub const HIGH_TIER_MIN: f64 = 0.7;
/// Overall scores at or above this (and below high) need attention.
pub const MEDIUM_TIER_MIN: f64 = 0.5;

/// Similarity tier of a pair, from its overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityTier {
    Normal,
    Medium,
    High,
}

impl SimilarityTier {
    /// Inclusive lower bounds: 0.7 -> High, 0.5 -> Medium.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= HIGH_TIER_MIN => SimilarityTier::High,
            s if s >= MEDIUM_TIER_MIN => SimilarityTier::Medium,
            _ => SimilarityTier::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityTier::Normal => "Normal",
            SimilarityTier::Medium => "Medium",
            SimilarityTier::High => "High",
        }
    }
}

impl std::fmt::Display for SimilarityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
