// Markdown scanning for homework reports.
//
// Pure, total functions over raw report text: prose normalization, code
// block and URL extraction, and a structural summary. Malformed markup never
// fails; unmatched fences or brackets are simply left as prose.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("FENCED_BLOCK regex is invalid"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("INLINE_CODE regex is invalid"));
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)]+").expect("URL regex is invalid"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\n]*?\]\([^\n]*?\)").expect("IMAGE regex is invalid"));
static IMAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\n]*?\]").expect("IMAGE_REF regex is invalid"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\n]*?\]\([^\n]*?\)").expect("LINK regex is invalid"));
static HEADING_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#+[ \t]*").expect("HEADING_MARK regex is invalid"));
static STAR_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*+([^*]+)\*+").expect("STAR_EMPHASIS regex is invalid"));
static UNDERSCORE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+([^_]+)_+").expect("UNDERSCORE_EMPHASIS regex is invalid"));
static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#+)[ \t]+(.+)$").expect("HEADING_LINE regex is invalid"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[-*+][ \t]+").expect("LIST_ITEM regex is invalid"));

const FENCE: &str = "```";

/// Layout summary of a report: headings plus counts of markdown elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureDescriptor {
    /// (marker depth, title) in document order
    pub headings: Vec<(usize, String)>,
    pub heading_level_counts: BTreeMap<usize, usize>,
    pub list_item_count: usize,
    pub code_block_count: usize,
    pub image_count: usize,
    pub link_count: usize,
}

impl StructureDescriptor {
    /// True when the document has no headings and no counted elements at all.
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
            && self.list_item_count == 0
            && self.code_block_count == 0
            && self.image_count == 0
            && self.link_count == 0
    }
}

/// Reduce a report to prose: code, links, images and markup removed,
/// whitespace collapsed to single spaces.
pub fn normalize_text(content: &str) -> String {
    let text = FENCED_BLOCK.replace_all(content, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = URL.replace_all(&text, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "");
    let text = HEADING_MARK.replace_all(&text, "");
    let text = STAR_EMPHASIS.replace_all(&text, "$1");
    let text = UNDERSCORE_EMPHASIS.replace_all(&text, "$1");
    collapse_whitespace(&text)
}

/// Fenced block bodies (fence lines stripped) followed by inline code spans
/// from outside the fences. Order is document order within each group;
/// duplicates are kept.
pub fn extract_code_blocks(content: &str) -> Vec<String> {
    let mut blocks: Vec<String> = FENCED_BLOCK
        .find_iter(content)
        .map(|m| strip_fence(m.as_str()))
        .filter(|body| !body.is_empty())
        .collect();

    let outside_fences = FENCED_BLOCK.replace_all(content, "\n");
    blocks.extend(
        INLINE_CODE
            .captures_iter(&outside_fences)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
    );

    blocks
}

/// Every http(s) URL in the raw text, in document order.
pub fn extract_urls(content: &str) -> Vec<String> {
    URL.find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Scan headings and list items (outside fenced code) and count fences,
/// images and links across the whole document.
pub fn extract_structure(content: &str) -> StructureDescriptor {
    let mut structure = StructureDescriptor::default();
    let mut in_fence = false;

    for line in content.lines() {
        if line.trim_start().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = HEADING_LINE.captures(line) {
            let level = caps.get(1).map_or(0, |m| m.as_str().len());
            let title = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            if !title.is_empty() {
                structure.headings.push((level, title));
                *structure.heading_level_counts.entry(level).or_insert(0) += 1;
            }
        }
        if LIST_ITEM.is_match(line) {
            structure.list_item_count += 1;
        }
    }

    structure.code_block_count = content.matches(FENCE).count() / 2;
    structure.image_count = IMAGE_REF.find_iter(content).count();
    structure.link_count = LINK.find_iter(content).count();

    structure
}

/// Collapse every run of Unicode whitespace to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop the opening fence line (with its info string) and the closing fence.
fn strip_fence(block: &str) -> String {
    let inner = block.strip_prefix(FENCE).unwrap_or(block);
    let inner = inner.strip_suffix(FENCE).unwrap_or(inner);
    // The first line is the info string (e.g. "bash"), or empty.
    let body = match inner.split_once('\n') {
        Some((_info, rest)) => rest,
        None => "",
    };
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_markup() {
        let md = "# Title\n\nSome **bold** and _soft_ words.\n\n```bash\nls -la\n```\n\
                  Run `pwd` then see [docs](https://example.com) ![shot](a.png) end";
        assert_eq!(
            normalize_text(md),
            "Title Some bold and soft words. Run then see end"
        );
    }

    #[test]
    fn test_code_blocks_fenced_then_inline() {
        let md = "Use `whoami`.\n```bash\necho hi\necho bye\n```\nAnd `id`.";
        assert_eq!(
            extract_code_blocks(md),
            vec!["echo hi\necho bye", "whoami", "id"]
        );
    }

    #[test]
    fn test_empty_fence_is_skipped() {
        assert!(extract_code_blocks("```\n```").is_empty());
    }

    #[test]
    fn test_structure_counts() {
        let md = "# Intro\n## Setup\n- one\n- two\n* three\n\
                  ```sh\n# not a heading\n- not an item\n```\n\
                  ![img](x.png) [link](y)";
        let s = extract_structure(md);
        assert_eq!(
            s.headings,
            vec![(1, "Intro".to_string()), (2, "Setup".to_string())]
        );
        assert_eq!(s.heading_level_counts.get(&1), Some(&1));
        assert_eq!(s.heading_level_counts.get(&2), Some(&1));
        assert_eq!(s.list_item_count, 3);
        assert_eq!(s.code_block_count, 1);
        assert_eq!(s.image_count, 1);
        // Image syntax also contains a link
        assert_eq!(s.link_count, 2);
    }

    #[test]
    fn test_unclosed_fence_does_not_panic() {
        let md = "# Head\n```bash\nls -la\n";
        let s = extract_structure(md);
        assert_eq!(s.code_block_count, 0);
        assert!(extract_code_blocks(md).is_empty());
        assert_eq!(normalize_text(md), "Head ```bash ls -la");
    }

    #[test]
    fn test_urls() {
        let md = "see https://a.example/x and (http://b.example/y).";
        assert_eq!(
            extract_urls(md),
            vec!["https://a.example/x", "http://b.example/y"]
        );
    }
}
