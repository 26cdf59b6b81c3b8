// Code, command and structure similarity.
//
// Each function compares one feature dimension of two reports and returns a
// score in [0, 1]. All of them return 0.0 when either side has nothing to
// compare, and all of them are symmetric in their arguments.

use std::collections::BTreeSet;

use super::sequence;
use crate::features::markdown::{collapse_whitespace, StructureDescriptor};

/// Sequence-match the concatenated, case-folded, whitespace-collapsed code.
pub fn code_similarity<S: AsRef<str>>(blocks_a: &[S], blocks_b: &[S]) -> f64 {
    if blocks_a.is_empty() || blocks_b.is_empty() {
        return 0.0;
    }

    let code_a = normalize_code(blocks_a);
    let code_b = normalize_code(blocks_b);
    if code_a.is_empty() || code_b.is_empty() {
        return 0.0;
    }

    sequence::ratio(&code_a, &code_b)
}

/// Jaccard index over the command names (first token, lower-cased).
pub fn command_similarity<A, B>(commands_a: A, commands_b: B) -> f64
where
    A: IntoIterator,
    A::Item: AsRef<str>,
    B: IntoIterator,
    B::Item: AsRef<str>,
{
    let names_a = command_names(commands_a);
    let names_b = command_names(commands_b);
    if names_a.is_empty() || names_b.is_empty() {
        return 0.0;
    }
    jaccard(&names_a, &names_b)
}

/// Mean of the heading-title Jaccard index and four element-count ratios.
///
/// The heading term is left out when neither report has headings, so two
/// heading-less reports are judged on their element counts alone. Two
/// reports with no structure at all agree on every count and score 1.0;
/// only a structured report against a bare one scores 0.0 outright.
pub fn structure_similarity(a: &StructureDescriptor, b: &StructureDescriptor) -> f64 {
    if a.is_empty() != b.is_empty() {
        return 0.0;
    }

    let mut parts = Vec::with_capacity(5);

    let titles_a = heading_titles(a);
    let titles_b = heading_titles(b);
    if !(titles_a.is_empty() && titles_b.is_empty()) {
        parts.push(jaccard(&titles_a, &titles_b));
    }

    parts.push(count_ratio(a.list_item_count, b.list_item_count));
    parts.push(count_ratio(a.code_block_count, b.code_block_count));
    parts.push(count_ratio(a.image_count, b.image_count));
    parts.push(count_ratio(a.link_count, b.link_count));

    parts.iter().sum::<f64>() / parts.len() as f64
}

/// |A ∩ B| / |A ∪ B|, or 0.0 when both sets are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// 1.0 if both counts are zero, 0.0 if only one is, else min / max.
pub fn count_ratio(a: usize, b: usize) -> f64 {
    match (a, b) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        _ => a.min(b) as f64 / a.max(b) as f64,
    }
}

fn normalize_code<S: AsRef<str>>(blocks: &[S]) -> String {
    let parts: Vec<&str> = blocks.iter().map(|b| b.as_ref()).collect();
    collapse_whitespace(&parts.join("\n").to_lowercase())
}

fn command_names<I>(commands: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    commands
        .into_iter()
        .filter_map(|cmd| cmd.as_ref().split_whitespace().next().map(str::to_lowercase))
        .collect()
}

fn heading_titles(s: &StructureDescriptor) -> BTreeSet<String> {
    s.headings.iter().map(|(_, title)| title.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure(
        headings: &[&str],
        lists: usize,
        code: usize,
        images: usize,
        links: usize,
    ) -> StructureDescriptor {
        StructureDescriptor {
            headings: headings.iter().map(|h| (2, h.to_string())).collect(),
            list_item_count: lists,
            code_block_count: code,
            image_count: images,
            link_count: links,
            ..Default::default()
        }
    }

    #[test]
    fn test_code_case_and_whitespace_insensitive() {
        let a = ["Echo   HI\n\nls"];
        let b = ["echo hi ls"];
        assert_eq!(code_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_code_empty_side() {
        let empty: [&str; 0] = [];
        assert_eq!(code_similarity(&empty, &["ls"]), 0.0);
        assert_eq!(code_similarity(&["   "], &["ls"]), 0.0);
    }

    #[test]
    fn test_command_names_only() {
        let a = ["sudo apt install foo", "ls -la"];
        let b = ["SUDO apt remove bar", "mkdir x"];
        // {sudo, ls} vs {sudo, mkdir}
        assert!((command_similarity(a, b) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_command_empty_side() {
        let empty: Vec<String> = vec![];
        assert_eq!(command_similarity(&empty, ["ls"]), 0.0);
    }

    #[test]
    fn test_count_ratio_rules() {
        assert_eq!(count_ratio(0, 0), 1.0);
        assert_eq!(count_ratio(0, 3), 0.0);
        assert_eq!(count_ratio(4, 0), 0.0);
        assert_eq!(count_ratio(2, 4), 0.5);
    }

    #[test]
    fn test_structure_identical() {
        let s = structure(&["Intro", "Setup"], 3, 1, 2, 1);
        assert_eq!(structure_similarity(&s, &s), 1.0);
    }

    #[test]
    fn test_structure_headings_case_folded() {
        let a = structure(&["Setup"], 1, 0, 0, 0);
        let b = structure(&["SETUP"], 1, 0, 0, 0);
        assert_eq!(structure_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_structure_heading_term_skipped_when_both_empty() {
        let a = structure(&[], 2, 1, 0, 0);
        let b = structure(&[], 4, 1, 0, 0);
        // (0.5 + 1 + 1 + 1) / 4
        assert!((structure_similarity(&a, &b) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_structure_heading_term_zero_when_one_side_has_none() {
        let a = structure(&["Intro"], 2, 1, 0, 0);
        let b = structure(&[], 2, 1, 0, 0);
        // (0 + 1 + 1 + 1 + 1) / 5
        assert!((structure_similarity(&a, &b) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_structure_empty_descriptor() {
        let a = structure(&["Intro"], 2, 1, 0, 0);
        let empty = StructureDescriptor::default();
        assert_eq!(structure_similarity(&a, &empty), 0.0);
        assert_eq!(structure_similarity(&empty, &a), 0.0);
    }

    #[test]
    fn test_structure_both_bare_agree() {
        let empty = StructureDescriptor::default();
        assert_eq!(structure_similarity(&empty, &empty), 1.0);
    }
}
