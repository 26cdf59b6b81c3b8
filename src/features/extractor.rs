// Feature extraction: turns one report into the four comparable dimensions.
//
// A FeatureSet is computed once per document and then shared read-only by
// every pair comparison that involves it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::commands::CommandPatternTable;
use super::markdown::{self, StructureDescriptor};

/// Code lines starting with one of these are comments, not commands.
pub const DEFAULT_IGNORE_PREFIXES: [&str; 3] = ["#", "//", "/*"];

/// Everything the scorers need from one report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Prose only, whitespace collapsed
    pub normalized_text: String,
    /// Fenced block bodies, then inline code spans
    pub code_blocks: Vec<String>,
    /// Deduplicated command candidates (full lines, not just names)
    pub commands: BTreeSet<String>,
    pub urls: Vec<String>,
    pub structure: StructureDescriptor,
    pub word_count: usize,
    pub char_count: usize,
    pub line_count: usize,
}

/// A submission together with its extracted features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub raw_text: String,
    pub features: FeatureSet,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        extractor: &FeatureExtractor,
    ) -> Self {
        let raw_text = raw_text.into();
        let features = extractor.extract(&raw_text);
        Self {
            id: id.into(),
            raw_text,
            features,
        }
    }
}

/// Deterministic, total extraction driven by a command pattern table.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    patterns: CommandPatternTable,
    ignore_prefixes: Vec<String>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(CommandPatternTable::default())
    }
}

impl FeatureExtractor {
    pub fn new(patterns: CommandPatternTable) -> Self {
        Self {
            patterns,
            ignore_prefixes: DEFAULT_IGNORE_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_ignore_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.ignore_prefixes = prefixes;
        self
    }

    /// Extract every feature from raw report text. Never fails; empty or
    /// malformed input yields empty collections.
    pub fn extract(&self, raw: &str) -> FeatureSet {
        let text = normalize_line_endings(raw);

        let code_blocks = markdown::extract_code_blocks(&text);
        let commands = self.extract_commands(&text, &code_blocks);

        FeatureSet {
            normalized_text: markdown::normalize_text(&text),
            commands,
            urls: markdown::extract_urls(&text),
            structure: markdown::extract_structure(&text),
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            line_count: text.split('\n').count(),
            code_blocks,
        }
    }

    /// Pattern matches over the text and over each code line, plus every
    /// non-comment code line as a candidate command.
    pub fn extract_commands(&self, text: &str, code_blocks: &[String]) -> BTreeSet<String> {
        let mut commands: BTreeSet<String> = self
            .patterns
            .find_all(text)
            .map(str::trim)
            .filter(|cmd| !cmd.is_empty())
            .map(str::to_string)
            .collect();

        for line in code_blocks.iter().flat_map(|block| block.lines()) {
            let line = line.trim();
            if line.is_empty() || self.is_comment(line) {
                continue;
            }
            commands.extend(
                self.patterns
                    .find_all(line)
                    .map(str::trim)
                    .filter(|cmd| !cmd.is_empty())
                    .map(str::to_string),
            );
            commands.insert(line.to_string());
        }

        commands
    }

    fn is_comment(&self, line: &str) -> bool {
        self.ignore_prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }
}

fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}
