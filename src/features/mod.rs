// Feature extraction: markdown scanning, command recognition, and the
// per-document FeatureSet consumed by the similarity scorers.

pub mod commands;
pub mod extractor;
pub mod markdown;

pub use commands::{CommandPattern, CommandPatternSpec, CommandPatternTable};
pub use extractor::{Document, FeatureExtractor, FeatureSet};
pub use markdown::StructureDescriptor;
