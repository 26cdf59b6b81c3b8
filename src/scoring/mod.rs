// Aggregation: dimension weights, the overall score, and classification.

pub mod aggregate;
pub mod tier;
pub mod weights;

pub use aggregate::Aggregator;
pub use tier::SimilarityTier;
pub use weights::{parse_weights, SimilarityWeights};
