// Pairwise comparison engine.
//
// Extraction runs once per document, then every unordered pair of documents
// is scored against the shared read-only FeatureSets. Both stages run on a
// dedicated rayon pool sized by `max_workers`. Workers only return values;
// the ordered collect is the single accumulator, so results come back in
// (i, j) order no matter which worker finished first.

use std::collections::HashSet;

use chrono::Utc;
use indicatif::ProgressBar;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn, Span};

use super::cancel::CancelToken;
use super::stats::compute_statistics;
use crate::config::CheckerConfig;
use crate::corpus::{Corpus, Submission};
use crate::error::CheckError;
use crate::features::{Document, FeatureExtractor};
use crate::models::{ComparisonResult, RunOutcome, RunResult, SimilarityVector};
use crate::scoring::Aggregator;
use crate::similarity::SimilarityScorer;

pub struct ComparisonEngine {
    extractor: FeatureExtractor,
    scorer: SimilarityScorer,
    aggregator: Aggregator,
    pool: ThreadPool,
    span: Span,
    progress: ProgressBar,
    cancel: CancelToken,
}

impl ComparisonEngine {
    /// Validate the configuration and build the worker pool.
    pub fn new(config: &CheckerConfig) -> Result<Self, CheckError> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(|i| format!("hwcheck-worker-{i}"))
            .build()?;

        Ok(Self {
            extractor: FeatureExtractor::new(config.command_patterns.clone()),
            scorer: SimilarityScorer::from_settings(&config.text),
            aggregator: Aggregator::from_config(config)?,
            pool,
            span: Span::none(),
            progress: ProgressBar::hidden(),
            cancel: CancelToken::new(),
        })
    }

    /// Parent span for every event the engine and its scorers emit.
    pub fn with_span(self, span: Span) -> Self {
        Self {
            scorer: self.scorer.with_span(span.clone()),
            span,
            ..self
        }
    }

    /// Progress bar advanced once per scored pair. Hidden by default.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A clone of the token the engine checks between pairs.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Extract features for every usable submission, sorted by student id.
    ///
    /// Blank submissions are skipped. When a student id appears more than
    /// once, the first non-blank submission wins.
    pub fn extract(&self, submissions: &[Submission]) -> Vec<Document> {
        let non_blank = submissions.iter().filter(|s| {
            let blank = s.raw_text.trim().is_empty();
            if blank {
                warn!(
                    parent: &self.span,
                    student = %s.student_id,
                    "Skipping empty submission"
                );
            }
            !blank
        });
        let mut usable = first_by_id(&self.span, non_blank, submission_id);

        usable.sort_by(|a, b| a.student_id.cmp(&b.student_id));

        let documents: Vec<Document> = self.pool.install(|| {
            usable
                .par_iter()
                .map(|s| {
                    Document::new(s.student_id.clone(), s.raw_text.clone(), &self.extractor)
                })
                .collect()
        });

        debug!(parent: &self.span, documents = documents.len(), "Features extracted");
        documents
    }

    /// Score one pair of documents.
    pub fn compare_pair(&self, a: &Document, b: &Document) -> ComparisonResult {
        let scores = self.scorer.score(&a.features, &b.features);
        let similarity = self.aggregator.aggregate(&scores);
        let (is_suspicious, tier) = self.aggregator.classify(&similarity);

        debug!(
            parent: &self.span,
            student_a = %a.id,
            student_b = %b.id,
            overall = similarity.overall,
            "Pair scored"
        );

        ComparisonResult {
            student_a: a.id.clone(),
            student_b: b.id.clone(),
            similarity,
            is_suspicious,
            tier,
        }
    }

    /// Extract and score two raw reports without building a corpus.
    pub fn compare_texts(&self, a: &str, b: &str) -> SimilarityVector {
        let a = self.extractor.extract(a);
        let b = self.extractor.extract(b);
        self.aggregator.aggregate(&self.scorer.score(&a, &b))
    }

    /// Score every unordered pair of already-extracted documents.
    ///
    /// Documents are ordered by id first, so the output does not depend on
    /// the order they were passed in. A repeated id keeps its first
    /// document. The cancel token is checked before each pair; a cancelled
    /// run keeps the pairs that finished.
    pub fn compare_documents(&self, documents: &[Document]) -> RunOutcome {
        let mut ordered = first_by_id(&self.span, documents, document_id);
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        let n = ordered.len();
        if n < 2 {
            warn!(parent: &self.span, documents = n, "Need at least two documents to compare");
            return RunOutcome::InsufficientCorpus { documents: n };
        }

        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();

        info!(
            parent: &self.span,
            documents = n,
            pairs = pairs.len(),
            "Comparing documents"
        );
        self.progress.set_length(pairs.len() as u64);
        self.progress.set_position(0);

        let scored: Vec<Option<ComparisonResult>> = self.pool.install(|| {
            pairs
                .par_iter()
                .map(|&(i, j)| {
                    if self.cancel.is_cancelled() {
                        return None;
                    }
                    let result = self.compare_pair(ordered[i], ordered[j]);
                    self.progress.inc(1);
                    self.cancel.record_pair();
                    Some(result)
                })
                .collect()
        });

        let cancelled = scored.iter().any(Option::is_none);
        let comparisons: Vec<ComparisonResult> = scored.into_iter().flatten().collect();

        for c in comparisons.iter().filter(|c| c.is_suspicious) {
            warn!(
                parent: &self.span,
                student_a = %c.student_a,
                student_b = %c.student_b,
                overall = c.similarity.overall,
                "High similarity"
            );
        }

        let timestamp = Utc::now();
        let statistics = compute_statistics(&comparisons, timestamp);
        let high_similarity_pairs: Vec<ComparisonResult> =
            comparisons.iter().filter(|c| c.is_suspicious).cloned().collect();

        let result = RunResult {
            comparisons,
            high_similarity_pairs,
            statistics,
            timestamp,
        };

        if cancelled {
            self.progress.abandon();
            warn!(
                parent: &self.span,
                scored = result.comparisons.len(),
                total = pairs.len(),
                "Comparison cancelled, returning partial results"
            );
            return RunOutcome::Cancelled(result);
        }

        self.progress.finish_and_clear();
        info!(
            parent: &self.span,
            comparisons = result.statistics.total_comparisons,
            flagged = result.statistics.high_similarity_count,
            avg = result.statistics.avg_similarity,
            "Comparison complete"
        );
        RunOutcome::Completed(result)
    }

    /// Extract the corpus and compare every pair.
    pub fn run(&self, corpus: &Corpus) -> RunOutcome {
        let documents = self.extract(corpus.submissions());
        self.compare_documents(&documents)
    }
}

/// Keep the first item for each id, in input order.
fn first_by_id<'a, T>(
    span: &Span,
    items: impl IntoIterator<Item = &'a T>,
    id: fn(&T) -> &str,
) -> Vec<&'a T>
where
    T: 'a,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept = Vec::new();
    for item in items {
        if seen.insert(id(item)) {
            kept.push(item);
        } else {
            warn!(parent: span, student = id(item), "Duplicate student id, keeping the first");
        }
    }
    kept
}

fn submission_id(submission: &Submission) -> &str {
    &submission.student_id
}

fn document_id(document: &Document) -> &str {
    &document.id
}
