// Error types for the similarity core.
//
// Only configuration and corpus-wide faults surface as errors. Per-document
// and per-pair problems are logged and skipped inside the engine, and
// degenerate text vectorization falls back to sequence matching.

use thiserror::Error;

/// Rejected configuration, reported before any comparison runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("similarity weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("weight for `{name}` must be a finite value in [0, 1], got {value}")]
    WeightValue { name: String, value: f64 },

    #[error("unknown weight key `{0}` (expected text, code, command, structure)")]
    UnknownWeight(String),

    #[error("missing weight for `{0}`")]
    MissingWeight(&'static str),

    #[error("malformed weight entry `{0}` (expected name=value)")]
    MalformedWeight(String),

    #[error("similarity threshold must be in [0, 1], got {0}")]
    Threshold(f64),

    #[error("max_workers must be at least 1")]
    ZeroWorkers,

    #[error("command pattern table is empty")]
    NoPatterns,

    #[error("invalid command pattern `{name}`: {reason}")]
    InvalidPattern { name: String, reason: String },
}

/// Errors returned by the comparison engine.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a term-vector comparison could not be computed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorizeError {
    #[error("empty vocabulary after tokenization")]
    EmptyVocabulary,

    #[error("document vector has zero norm")]
    ZeroNorm,
}
