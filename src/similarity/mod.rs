// Similarity scoring: one function per dimension plus the text strategies
// and the sequence matcher they fall back to.

pub mod dimensions;
pub mod scorer;
pub mod segment;
pub mod sequence;
pub mod text;
pub mod tfidf;

pub use dimensions::{code_similarity, command_similarity, structure_similarity};
pub use scorer::{DimensionScores, SimilarityScorer};
pub use text::{SequenceRatio, TextSimilarity, TextStrategy, TfIdfCosine};
