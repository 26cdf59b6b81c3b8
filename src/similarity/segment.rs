// Word segmentation for text similarity.
//
// Chinese has no whitespace between words, so reports are cut with jieba
// before building term vectors. Segments are then reduced to word tokens:
// lower-cased runs of letters, digits and underscores, at least two
// characters long.

use std::collections::HashSet;
use std::sync::LazyLock;

use jieba_rs::Jieba;

/// The default dictionary takes a noticeable moment to load; share one.
static JIEBA: LazyLock<Jieba> = LazyLock::new(Jieba::new);

/// Splits text into candidate word segments.
pub trait Segmenter: Send + Sync {
    fn segment<'t>(&self, text: &'t str) -> Vec<&'t str>;
}

/// Dictionary + HMM segmentation, suitable for mixed Chinese/English text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JiebaSegmenter;

impl Segmenter for JiebaSegmenter {
    fn segment<'t>(&self, text: &'t str) -> Vec<&'t str> {
        JIEBA.cut(text, true)
    }
}

/// Plain whitespace splitting, for corpora without CJK text.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.split_whitespace().collect()
    }
}

/// Turns text into the token stream used for term vectors.
pub struct Tokenizer {
    segmenter: Box<dyn Segmenter>,
    stop_words: HashSet<String>,
    min_token_chars: usize,
}

impl Tokenizer {
    pub fn new(
        segmenter: Box<dyn Segmenter>,
        stop_words: HashSet<String>,
        min_token_chars: usize,
    ) -> Self {
        Self {
            segmenter,
            stop_words,
            min_token_chars,
        }
    }

    /// Segment, lower-case, split on non-word characters, and drop short
    /// tokens and stop words. Token order follows the text.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.segmenter
            .segment(text)
            .into_iter()
            .flat_map(|segment| segment.split(|c: char| !is_word_char(c)))
            .filter(|piece| piece.chars().count() >= self.min_token_chars)
            .map(str::to_lowercase)
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
