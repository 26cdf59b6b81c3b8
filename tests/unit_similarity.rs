// Unit tests for the similarity dimensions.
//
// Tests the sequence matcher, TF-IDF vectors, the text strategy fallback,
// and the code/command/structure functions at their edge cases.

use std::collections::HashSet;

use hwcheck::config::TextSettings;
use hwcheck::error::VectorizeError;
use hwcheck::features::StructureDescriptor;
use hwcheck::similarity::segment::{JiebaSegmenter, Tokenizer, WhitespaceSegmenter};
use hwcheck::similarity::sequence::ratio;
use hwcheck::similarity::tfidf::{cosine, vectorize_pair};
use hwcheck::similarity::{
    code_similarity, command_similarity, structure_similarity, SequenceRatio, TextSimilarity,
    TextStrategy, TfIdfCosine,
};

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

// ============================================================
// Sequence ratio
// ============================================================

#[test]
fn ratio_identical_and_disjoint() {
    assert_eq!(ratio("abc", "abc"), 1.0);
    assert_eq!(ratio("abc", "xyz"), 0.0);
    assert_eq!(ratio("", ""), 1.0);
    assert_eq!(ratio("abc", ""), 0.0);
}

#[test]
fn ratio_matches_longest_blocks() {
    // "abcd" vs "bcde": block "bcd" -> 2 * 3 / 8
    assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-12);
}

#[test]
fn ratio_is_symmetric_on_multibyte_text() {
    let a = "创建逻辑卷并扩展文件系统";
    let b = "扩展逻辑卷然后创建文件系统";
    assert_eq!(ratio(a, b), ratio(b, a));
}

// ============================================================
// TF-IDF
// ============================================================

#[test]
fn vectorize_weights_unique_terms_higher() {
    let (a, _) = vectorize_pair(&tokens(&["disk", "volume"]), &tokens(&["disk"])).unwrap();
    assert!((a["disk"] - 1.0).abs() < 1e-12);
    assert!((a["volume"] - (1.5_f64.ln() + 1.0)).abs() < 1e-12);
}

#[test]
fn vectorize_empty_vocabulary() {
    assert_eq!(
        vectorize_pair(&[], &[]).unwrap_err(),
        VectorizeError::EmptyVocabulary
    );
}

#[test]
fn cosine_zero_norm_side() {
    let (a, b) = vectorize_pair(&tokens(&["disk"]), &[]).unwrap();
    assert_eq!(cosine(&a, &b).unwrap_err(), VectorizeError::ZeroNorm);
}

#[test]
fn cosine_disjoint_is_zero() {
    let (a, b) = vectorize_pair(&tokens(&["disk"]), &tokens(&["user"])).unwrap();
    assert_eq!(cosine(&a, &b).unwrap(), 0.0);
}

// ============================================================
// Text strategies
// ============================================================

#[test]
fn jieba_splits_chinese_words() {
    let tokenizer = Tokenizer::new(Box::new(JiebaSegmenter), HashSet::new(), 2);
    let toks = tokenizer.tokenize("我们安装软件");
    assert!(toks.len() >= 2, "{toks:?}");
    assert!(toks.iter().all(|t| t.chars().count() >= 2));
}

#[test]
fn tfidf_strategy_reports_degenerate_input() {
    let tokenizer = Tokenizer::new(Box::new(WhitespaceSegmenter), HashSet::new(), 5);
    let strategy = TfIdfCosine::new(tokenizer);
    assert_eq!(strategy.score("a b", "c d"), Err(VectorizeError::EmptyVocabulary));
}

#[test]
fn sequence_strategy_never_fails() {
    assert_eq!(SequenceRatio.score("a b", "a b"), Ok(1.0));
}

#[test]
fn text_similarity_falls_back_to_sequence_ratio() {
    let settings = TextSettings {
        stop_words: vec![],
        english_stop_words: false,
        min_token_chars: 10,
    };
    let sim = TextSimilarity::with_segmenter(&settings, Box::new(WhitespaceSegmenter));
    assert!((sim.score("abcd", "bcde") - 0.75).abs() < 1e-12);
}

#[test]
fn text_similarity_related_beats_unrelated() {
    let sim = TextSimilarity::from_settings(&TextSettings::default());
    let base = "使用逻辑卷管理扩展磁盘分区容量";
    let related = "通过逻辑卷管理扩展磁盘容量";
    let unrelated = "配置防火墙规则允许网页访问";
    assert!(sim.score(base, related) > sim.score(base, unrelated));
}

// ============================================================
// Code / command / structure
// ============================================================

#[test]
fn code_similarity_ignores_layout() {
    let a = vec!["LS -LA\n\n\tpwd".to_string()];
    let b = vec!["ls -la pwd".to_string()];
    assert_eq!(code_similarity(&a, &b), 1.0);
}

#[test]
fn command_similarity_singletons() {
    assert_eq!(command_similarity(["ls -la"], ["ls -l /tmp"]), 1.0);
    assert_eq!(command_similarity(["ls -la"], ["pwd"]), 0.0);
}

#[test]
fn structure_both_bare_scores_one() {
    let empty = StructureDescriptor::default();
    assert_eq!(structure_similarity(&empty, &empty), 1.0);
}

#[test]
fn structure_bare_vs_structured_scores_zero() {
    let bare = StructureDescriptor::default();
    let structured = StructureDescriptor {
        headings: vec![(1, "安装".to_string())],
        list_item_count: 2,
        ..Default::default()
    };
    assert_eq!(structure_similarity(&bare, &structured), 0.0);
    assert_eq!(structure_similarity(&structured, &bare), 0.0);
}
