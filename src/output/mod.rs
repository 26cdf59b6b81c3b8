// Output: terminal display and the JSON results file.

pub mod terminal;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{ComparisonResult, RunResult};

/// Overall score at which an unflagged pair is still worth a look.
pub const ATTENTION_MIN: f64 = 0.3;

/// What a reviewer should do with a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Normal,
    Attention,
    Suspicious,
}

impl ReviewStatus {
    pub fn of(result: &ComparisonResult) -> Self {
        if result.is_suspicious {
            ReviewStatus::Suspicious
        } else if result.similarity.overall >= ATTENTION_MIN {
            ReviewStatus::Attention
        } else {
            ReviewStatus::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Normal => "normal",
            ReviewStatus::Attention => "attention",
            ReviewStatus::Suspicious => "suspicious",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write the run as pretty JSON, creating parent directories as needed.
pub fn save_results(result: &RunResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Student ids are often Chinese names; byte slicing would panic on them.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
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
    fn test_review_status() {
        assert_eq!(ReviewStatus::of(&result(0.9, true)), ReviewStatus::Suspicious);
        assert_eq!(ReviewStatus::of(&result(0.3, false)), ReviewStatus::Attention);
        assert_eq!(ReviewStatus::of(&result(0.29, false)), ReviewStatus::Normal);
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("张三丰", 2), "张三...");
        assert_eq!(truncate_chars("abc", 5), "abc");
    }
}
