// Corpus statistics over the overall scores of a run.
//
// Pure aggregates, so the result does not depend on the order in which
// workers finished. Comparisons are summed in their stored order, which
// keeps repeated runs bit-identical.

use chrono::{DateTime, Utc};

use crate::models::{ComparisonResult, CorpusStatistics};

/// Count, mean, max, min and population standard deviation of `overall`.
/// An empty slice yields all-zero statistics.
pub fn compute_statistics(
    comparisons: &[ComparisonResult],
    timestamp: DateTime<Utc>,
) -> CorpusStatistics {
    let scores: Vec<f64> = comparisons.iter().map(|c| c.similarity.overall).collect();
    let high_similarity_count = comparisons.iter().filter(|c| c.is_suspicious).count();

    if scores.is_empty() {
        return CorpusStatistics {
            total_comparisons: 0,
            high_similarity_count,
            avg_similarity: 0.0,
            max_similarity: 0.0,
            min_similarity: 0.0,
            std_similarity: 0.0,
            timestamp,
        };
    }

    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);

    CorpusStatistics {
        total_comparisons: scores.len(),
        high_similarity_count,
        avg_similarity: mean,
        max_similarity: max,
        min_similarity: min,
        std_similarity: variance.sqrt(),
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SimilarityVector;
    use crate::scoring::SimilarityTier;

    fn result(overall: f64, is_suspicious: bool) -> ComparisonResult {
        ComparisonResult {
            student_a: "a".to_string(),
            student_b: "b".to_string(),
            similarity: SimilarityVector {
                overall,
                ..Default::default()
            },
            is_suspicious,
            tier: SimilarityTier::from_score(overall),
        }
    }

    #[test]
    fn test_statistics() {
        let comparisons = vec![result(0.2, false), result(0.4, false), result(0.9, true)];
        let stats = compute_statistics(&comparisons, Utc::now());
        assert_eq!(stats.total_comparisons, 3);
        assert_eq!(stats.high_similarity_count, 1);
        assert!((stats.avg_similarity - 0.5).abs() < 1e-12);
        assert_eq!(stats.max_similarity, 0.9);
        assert_eq!(stats.min_similarity, 0.2);
        // population variance: (0.09 + 0.01 + 0.16) / 3
        assert!((stats.std_similarity - (0.26_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = compute_statistics(&[], Utc::now());
        assert_eq!(stats.total_comparisons, 0);
        assert_eq!(stats.avg_similarity, 0.0);
        assert_eq!(stats.std_similarity, 0.0);
    }
}
