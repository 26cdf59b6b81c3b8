// Comparison pipeline: the parallel engine, its cancellation signal, and
// corpus statistics.

pub mod cancel;
pub mod engine;
pub mod stats;

pub use cancel::CancelToken;
pub use engine::ComparisonEngine;
pub use stats::compute_statistics;
