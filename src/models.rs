// Result models: the data contract handed to report renderers.
//
// These are the types that flow out of a comparison run. They serialize to
// self-describing JSON so renderers and plotting tools can consume them
// without depending on the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::tier::SimilarityTier;

/// The four dimension scores plus the weighted overall score for one pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityVector {
    pub text: f64,
    pub code: f64,
    pub command: f64,
    pub structure: f64,
    pub overall: f64,
}

/// One scored pair of students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub student_a: String,
    pub student_b: String,
    pub similarity: SimilarityVector,
    pub is_suspicious: bool,
    pub tier: SimilarityTier,
}

impl ComparisonResult {
    /// Flat view with the pair and all five scores side by side.
    pub fn to_record(&self) -> ComparisonRecord {
        ComparisonRecord {
            student_a: self.student_a.clone(),
            student_b: self.student_b.clone(),
            text: self.similarity.text,
            code: self.similarity.code,
            command: self.similarity.command,
            structure: self.similarity.structure,
            overall: self.similarity.overall,
            is_suspicious: self.is_suspicious,
            tier: self.tier,
        }
    }
}

/// Flat record form of a ComparisonResult (one row per pair).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub student_a: String,
    pub student_b: String,
    pub text: f64,
    pub code: f64,
    pub command: f64,
    pub structure: f64,
    pub overall: f64,
    pub is_suspicious: bool,
    pub tier: SimilarityTier,
}

/// Aggregate statistics over the overall scores of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub total_comparisons: usize,
    pub high_similarity_count: usize,
    pub avg_similarity: f64,
    pub max_similarity: f64,
    pub min_similarity: f64,
    /// Population standard deviation
    pub std_similarity: f64,
    pub timestamp: DateTime<Utc>,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// One entry per unordered pair, in (i, j) order over sorted student ids
    pub comparisons: Vec<ComparisonResult>,
    /// The flagged subset of `comparisons`, same order
    pub high_similarity_pairs: Vec<ComparisonResult>,
    pub statistics: CorpusStatistics,
    pub timestamp: DateTime<Utc>,
}

impl RunResult {
    pub fn records(&self) -> Vec<ComparisonRecord> {
        self.comparisons.iter().map(ComparisonResult::to_record).collect()
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every pair was scored.
    Completed(RunResult),
    /// Cancelled mid-batch; holds the pairs finished before the signal.
    Cancelled(RunResult),
    /// Fewer than two usable documents. A normal outcome, not a failure.
    InsufficientCorpus { documents: usize },
}

impl RunOutcome {
    /// The run result, if any pairs were attempted.
    pub fn result(&self) -> Option<&RunResult> {
        match self {
            RunOutcome::Completed(r) | RunOutcome::Cancelled(r) => Some(r),
            RunOutcome::InsufficientCorpus { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<RunResult> {
        match self {
            RunOutcome::Completed(r) | RunOutcome::Cancelled(r) => Some(r),
            RunOutcome::InsufficientCorpus { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled(_))
    }
}
