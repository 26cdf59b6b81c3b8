// Combines dimension scores into the overall score and classifies the pair.
//
// The suspicious flag uses the configurable similarity threshold. The tier
// uses the fixed presentation bounds in `tier`, so a pair can be Medium
// without being flagged, or flagged below High when the threshold is lowered.

use crate::config::CheckerConfig;
use crate::error::ConfigError;
use crate::models::SimilarityVector;
use crate::similarity::DimensionScores;

use super::tier::SimilarityTier;
use super::weights::SimilarityWeights;

/// Weighted aggregation plus threshold classification.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    weights: SimilarityWeights,
    threshold: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            weights: SimilarityWeights::default(),
            threshold: crate::config::DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl Aggregator {
    pub fn new(weights: SimilarityWeights, threshold: f64) -> Result<Self, ConfigError> {
        weights.validate()?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Threshold(threshold));
        }
        Ok(Self { weights, threshold })
    }

    pub fn from_config(config: &CheckerConfig) -> Result<Self, ConfigError> {
        Self::new(config.weights, config.similarity_threshold)
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Attach the weighted overall score to the dimension scores.
    pub fn aggregate(&self, scores: &DimensionScores) -> SimilarityVector {
        SimilarityVector {
            text: scores.text,
            code: scores.code,
            command: scores.command,
            structure: scores.structure,
            overall: self.weights.combine(scores),
        }
    }

    /// Suspicious when the overall score meets the threshold (inclusive).
    pub fn is_suspicious(&self, vector: &SimilarityVector) -> bool {
        vector.overall >= self.threshold
    }

    pub fn classify(&self, vector: &SimilarityVector) -> (bool, SimilarityTier) {
        (
            self.is_suspicious(vector),
            SimilarityTier::from_score(vector.overall),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(text: f64, code: f64, command: f64, structure: f64) -> DimensionScores {
        DimensionScores {
            text,
            code,
            command,
            structure,
        }
    }

    #[test]
    fn test_all_ones_is_suspicious_high() {
        let agg = Aggregator::default();
        let v = agg.aggregate(&scores(1.0, 1.0, 1.0, 1.0));
        assert!((v.overall - 1.0).abs() < 1e-12);
        assert_eq!(agg.classify(&v), (true, SimilarityTier::High));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let agg = Aggregator::new(SimilarityWeights::default(), 0.6).unwrap();
        let v = SimilarityVector {
            overall: 0.6,
            ..Default::default()
        };
        assert_eq!(agg.classify(&v), (true, SimilarityTier::Medium));
    }

    #[test]
    fn test_below_threshold() {
        let agg = Aggregator::default();
        // 0.4 * 0.5 + 0.2 * (1.0 + 0.5 + 0.5) = 0.6
        let v = agg.aggregate(&scores(0.5, 1.0, 0.5, 0.5));
        assert!((v.overall - 0.6).abs() < 1e-12);
        assert_eq!(agg.classify(&v), (false, SimilarityTier::Medium));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = Aggregator::new(SimilarityWeights::default(), -0.1).unwrap_err();
        assert_eq!(err, ConfigError::Threshold(-0.1));
    }

    #[test]
    fn test_from_config_keeps_weights() {
        let weights = SimilarityWeights::new(0.7, 0.1, 0.1, 0.1).unwrap();
        let config = CheckerConfig::default().with_weights(weights);
        let agg = Aggregator::from_config(&config).unwrap();
        assert_eq!(agg.weights(), &weights);
        assert_eq!(agg.threshold(), config.similarity_threshold);
    }
}
