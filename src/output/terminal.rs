// Colored terminal output for comparison runs.
//
// This module handles all terminal-specific formatting: colors and tables.
// The main.rs command handlers delegate here.

use colored::Colorize;

use super::{truncate_chars, ReviewStatus};
use crate::features::CommandPatternTable;
use crate::models::{ComparisonResult, CorpusStatistics, RunResult, SimilarityVector};
use crate::scoring::{Aggregator, SimilarityTier};

/// Suspicious pairs shown in the summary before the full table.
const TOP_SUSPICIOUS: usize = 5;

/// Statistics block, top suspicious pairs, then the full table.
pub fn display_run(result: &RunResult) {
    display_statistics(&result.statistics);
    display_suspicious_pairs(&result.high_similarity_pairs);
    display_comparison_table(&result.comparisons);
}

pub fn display_statistics(stats: &CorpusStatistics) {
    println!("\n{}", "=== Similarity Statistics ===".bold());
    println!("  Comparisons:      {}", stats.total_comparisons);
    println!(
        "  Flagged pairs:    {}",
        if stats.high_similarity_count > 0 {
            stats.high_similarity_count.to_string().red().bold()
        } else {
            stats.high_similarity_count.to_string().green()
        }
    );
    println!("  Mean similarity:  {:.3}", stats.avg_similarity);
    println!("  Max similarity:   {:.3}", stats.max_similarity);
    println!("  Min similarity:   {:.3}", stats.min_similarity);
    println!("  Std deviation:    {:.3}", stats.std_similarity);
}

/// The highest-scoring flagged pairs with their dimension breakdown.
pub fn display_suspicious_pairs(pairs: &[ComparisonResult]) {
    if pairs.is_empty() {
        println!("\n  {} No suspicious pairs found.", "✓".green());
        return;
    }

    let mut sorted: Vec<&ComparisonResult> = pairs.iter().collect();
    sorted.sort_by(|a, b| b.similarity.overall.total_cmp(&a.similarity.overall));

    println!(
        "\n{}",
        format!("=== Suspicious Pairs ({} total) ===", pairs.len()).bold()
    );
    for (i, pair) in sorted.iter().take(TOP_SUSPICIOUS).enumerate() {
        println!(
            "  {}. {} <-> {}  {}",
            i + 1,
            pair.student_a,
            pair.student_b,
            format!("{:.3}", pair.similarity.overall).red().bold()
        );
        println!(
            "     {}",
            format!(
                "text {:.3}  code {:.3}  command {:.3}  structure {:.3}",
                pair.similarity.text,
                pair.similarity.code,
                pair.similarity.command,
                pair.similarity.structure
            )
            .dimmed()
        );
    }
    if pairs.len() > TOP_SUSPICIOUS {
        println!(
            "  {}",
            format!("... and {} more", pairs.len() - TOP_SUSPICIOUS).dimmed()
        );
    }
}

/// Every pair, highest overall score first.
pub fn display_comparison_table(comparisons: &[ComparisonResult]) {
    if comparisons.is_empty() {
        return;
    }

    let mut sorted: Vec<&ComparisonResult> = comparisons.iter().collect();
    sorted.sort_by(|a, b| b.similarity.overall.total_cmp(&a.similarity.overall));

    println!("\n{}", "=== All Comparisons ===".bold());
    println!(
        "  {:<16} {:<16} {:>7} {:>6} {:>6} {:>7} {:>6}  {:<10}",
        "Student A".dimmed(),
        "Student B".dimmed(),
        "Overall".dimmed(),
        "Text".dimmed(),
        "Code".dimmed(),
        "Command".dimmed(),
        "Struct".dimmed(),
        "Status".dimmed(),
    );
    println!("  {}", "-".repeat(84).dimmed());

    for c in sorted {
        let s = &c.similarity;
        println!(
            "  {:<16} {:<16} {:>7.3} {:>6.3} {:>6.3} {:>7.3} {:>6.3}  {:<10}",
            truncate_chars(&c.student_a, 13),
            truncate_chars(&c.student_b, 13),
            s.overall,
            s.text,
            s.code,
            s.command,
            s.structure,
            colorize_status(ReviewStatus::of(c)),
        );
    }
}

/// Single pair breakdown for `hwcheck compare`.
pub fn display_vector(a: &str, b: &str, vector: &SimilarityVector, aggregator: &Aggregator) {
    let (is_suspicious, tier) = aggregator.classify(vector);
    let weights = aggregator.weights();

    println!("\n{}", format!("=== {a} <-> {b} ===").bold());
    println!("  Text:       {:.3}", vector.text);
    println!("  Code:       {:.3}", vector.code);
    println!("  Command:    {:.3}", vector.command);
    println!("  Structure:  {:.3}", vector.structure);
    println!("  Overall:    {:.3}  {}", vector.overall, colorize_tier(tier));
    println!(
        "  {}",
        format!(
            "weights: text {:.2}  code {:.2}  command {:.2}  structure {:.2}",
            weights.text, weights.code, weights.command, weights.structure
        )
        .dimmed()
    );
    if is_suspicious {
        println!(
            "  {} at or above threshold {:.2}",
            "!! suspicious".red().bold(),
            aggregator.threshold()
        );
    }
}

/// The active command pattern table.
pub fn display_patterns(table: &CommandPatternTable) {
    println!(
        "\n{}",
        format!("=== Command Patterns ({}) ===", table.len()).bold()
    );
    for pattern in table.iter() {
        println!(
            "  {:<12} {:<10} {}",
            pattern.name,
            pattern.category.dimmed(),
            pattern.source()
        );
    }
}

fn colorize_status(status: ReviewStatus) -> colored::ColoredString {
    match status {
        ReviewStatus::Suspicious => status.as_str().red().bold(),
        ReviewStatus::Attention => status.as_str().yellow(),
        ReviewStatus::Normal => status.as_str().green(),
    }
}

fn colorize_tier(tier: SimilarityTier) -> colored::ColoredString {
    match tier {
        SimilarityTier::High => tier.as_str().red().bold(),
        SimilarityTier::Medium => tier.as_str().yellow(),
        SimilarityTier::Normal => tier.as_str().green(),
    }
}
