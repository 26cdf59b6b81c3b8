// Dimension weights for the overall similarity score.
//
//   overall = text * w_text + code * w_code + command * w_command + structure * w_structure
//
// The four weights must each lie in [0, 1] and sum to 1.0, so the overall
// score stays in [0, 1] whenever the dimension scores do.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::similarity::DimensionScores;

/// Dimension names as they appear in configuration.
pub const DIMENSIONS: [&str; 4] = ["text", "code", "command", "structure"];

/// Allowed drift of the weight sum from 1.0 (decimal weights rarely add up exactly).
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Configurable weights for the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    /// Prose content (default 0.4)
    pub text: f64,
    /// Code blocks (default 0.2)
    pub code: f64,
    /// Command names used (default 0.2)
    pub command: f64,
    /// Headings and element counts (default 0.2)
    pub structure: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            text: 0.4,
            code: 0.2,
            command: 0.2,
            structure: 0.2,
        }
    }
}

impl SimilarityWeights {
    /// Build and validate a weight set.
    pub fn new(text: f64, code: f64, command: f64, structure: f64) -> Result<Self, ConfigError> {
        let weights = Self {
            text,
            code,
            command,
            structure,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Build from name -> weight pairs. Every dimension must be present
    /// exactly by name; unknown names are rejected.
    pub fn from_map<I, K>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut slots: [Option<f64>; 4] = [None; 4];
        for (name, value) in entries {
            let name = name.as_ref().trim();
            let idx = DIMENSIONS
                .iter()
                .position(|d| *d == name)
                .ok_or_else(|| ConfigError::UnknownWeight(name.to_string()))?;
            slots[idx] = Some(value);
        }

        let mut values = [0.0; 4];
        for (idx, slot) in slots.iter().enumerate() {
            values[idx] = slot.ok_or(ConfigError::MissingWeight(DIMENSIONS[idx]))?;
        }

        Self::new(values[0], values[1], values[2], values[3])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in DIMENSIONS.iter().zip(self.as_array()) {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightValue {
                    name: name.to_string(),
                    value,
                });
            }
        }
        let sum: f64 = self.as_array().iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }

    /// Weights in DIMENSIONS order.
    pub fn as_array(&self) -> [f64; 4] {
        [self.text, self.code, self.command, self.structure]
    }

    /// Weighted sum of the dimension scores, clamped to [0, 1].
    pub fn combine(&self, scores: &DimensionScores) -> f64 {
        let overall = scores.text * self.text
            + scores.code * self.code
            + scores.command * self.command
            + scores.structure * self.structure;
        overall.clamp(0.0, 1.0)
    }
}

/// Parse `text=0.4,code=0.2,command=0.2,structure=0.2`.
pub fn parse_weights(raw: &str) -> Result<SimilarityWeights, ConfigError> {
    let mut entries = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = part
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedWeight(part.to_string()))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::MalformedWeight(part.to_string()))?;
        entries.push((name.trim().to_string(), value));
    }
    SimilarityWeights::from_map(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_valid() {
        assert!(SimilarityWeights::default().validate().is_ok());
    }

    #[test]
    fn test_combine_linear() {
        let w = SimilarityWeights::default();
        let scores = DimensionScores {
            text: 0.5,
            code: 1.0,
            command: 0.0,
            structure: 0.25,
        };
        // 0.2 + 0.2 + 0.0 + 0.05
        assert!((w.combine(&scores) - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_sum_must_be_one() {
        let err = SimilarityWeights::new(0.5, 0.2, 0.2, 0.2).unwrap_err();
        assert!(matches!(err, ConfigError::WeightSum(s) if (s - 1.1).abs() < 1e-9));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = SimilarityWeights::new(1.2, -0.2, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, ConfigError::WeightValue { .. }));
    }

    #[test]
    fn test_parse_weights() {
        let w = parse_weights("text=0.25, code=0.25,command=0.25 ,structure=0.25").unwrap();
        assert_eq!(w.as_array(), [0.25; 4]);
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = parse_weights("text=0.4,code=0.2,command=0.2,layout=0.2").unwrap_err();
        assert_eq!(err, ConfigError::UnknownWeight("layout".to_string()));
    }

    #[test]
    fn test_parse_missing_key() {
        let err = parse_weights("text=0.6,code=0.2,command=0.2").unwrap_err();
        assert_eq!(err, ConfigError::MissingWeight("structure"));
    }

    #[test]
    fn test_parse_malformed_entry() {
        let err = parse_weights("text:0.4").unwrap_err();
        assert_eq!(err, ConfigError::MalformedWeight("text:0.4".to_string()));
    }
}
