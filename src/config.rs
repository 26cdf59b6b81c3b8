use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};

use crate::error::ConfigError;
use crate::features::CommandPatternTable;
use crate::scoring::weights::{parse_weights, SimilarityWeights};

/// Default flag threshold for the overall score.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Default worker pool size for extraction and comparison.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Homework types the course uses. Other names are accepted too.
pub const SUPPORTED_HOMEWORK_TYPES: [&str; 6] =
    ["H3", "H4", "H5", "chap0x03", "chap0x04", "chap0x05"];

/// Instruction words that appear in nearly every report ("step", "run",
/// "install", ...). They say nothing about who wrote what.
const HOMEWORK_STOP_WORDS: [&str; 21] = [
    "步骤", "方法", "操作", "执行", "运行", "输入", "输出", "命令", "结果", "显示", "查看",
    "创建", "删除", "修改", "安装", "配置", "启动", "停止", "重启", "测试", "验证",
];

/// Tokenization settings for text similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSettings {
    /// Extra words removed before building term vectors
    pub stop_words: Vec<String>,
    /// Also remove the standard English stop-word list
    pub english_stop_words: bool,
    /// Shorter tokens are dropped (single CJK characters, stray letters)
    pub min_token_chars: usize,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            stop_words: HOMEWORK_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            english_stop_words: true,
            min_token_chars: 2,
        }
    }
}

impl TextSettings {
    /// The full set of words to drop, lower-cased.
    pub fn stop_word_set(&self) -> HashSet<String> {
        let mut set: HashSet<String> = self.stop_words.iter().map(|w| w.to_lowercase()).collect();
        if self.english_stop_words {
            set.extend(get(LANGUAGE::English).into_iter().map(|w| w.to_lowercase()));
        }
        set
    }
}

/// Validated settings for one comparison run.
///
/// Built once at startup and passed down; the engine validates it again on
/// construction so a bad value is rejected before any pair is scored.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Pairs whose overall score meets this are flagged as suspicious
    pub similarity_threshold: f64,
    pub weights: SimilarityWeights,
    pub command_patterns: CommandPatternTable,
    pub max_workers: usize,
    pub text: TextSettings,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            weights: SimilarityWeights::default(),
            command_patterns: CommandPatternTable::default(),
            max_workers: DEFAULT_MAX_WORKERS,
            text: TextSettings::default(),
        }
    }
}

impl CheckerConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_command_patterns(mut self, patterns: CommandPatternTable) -> Self {
        self.command_patterns = patterns;
        self
    }

    pub fn with_text_settings(mut self, text: TextSettings) -> Self {
        self.text = text;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Threshold(self.similarity_threshold));
        }
        if self.max_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.command_patterns.is_empty() {
            return Err(ConfigError::NoPatterns);
        }
        self.weights.validate()
    }
}

/// Binary-facing configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; every value has a default.
pub struct Config {
    pub homework_dir: PathBuf,
    pub output_dir: PathBuf,
    pub similarity_threshold: f64,
    pub max_workers: usize,
    /// `text=0.4,code=0.2,command=0.2,structure=0.2`
    pub weights: Option<String>,
    /// JSON file replacing the built-in command pattern table
    pub patterns_file: Option<PathBuf>,
    pub english_stop_words: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let similarity_threshold = match env::var("HWCHECK_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("HWCHECK_THRESHOLD is not a number: {raw}"))?,
            Err(_) => DEFAULT_SIMILARITY_THRESHOLD,
        };

        let max_workers = match env::var("HWCHECK_MAX_WORKERS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("HWCHECK_MAX_WORKERS is not a positive integer: {raw}"))?,
            Err(_) => DEFAULT_MAX_WORKERS,
        };

        Ok(Self {
            homework_dir: env::var("HWCHECK_HOMEWORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("homework")),
            output_dir: env::var("HWCHECK_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("plagiarism_results")),
            similarity_threshold,
            max_workers,
            weights: env::var("HWCHECK_WEIGHTS").ok().filter(|w| !w.trim().is_empty()),
            patterns_file: env::var("HWCHECK_PATTERNS_FILE").ok().map(PathBuf::from),
            // "0" or "false" disables; unset keeps the default
            english_stop_words: !matches!(
                env::var("HWCHECK_ENGLISH_STOP_WORDS").as_deref(),
                Ok("0") | Ok("false")
            ),
        })
    }

    /// Build and validate the core configuration.
    pub fn checker(&self) -> Result<CheckerConfig> {
        let mut checker = CheckerConfig::default()
            .with_threshold(self.similarity_threshold)
            .with_max_workers(self.max_workers);

        if let Some(raw) = &self.weights {
            checker = checker.with_weights(parse_weights(raw)?);
        }

        if let Some(path) = &self.patterns_file {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read pattern file {}", path.display()))?;
            checker = checker.with_command_patterns(CommandPatternTable::from_json(&json)?);
        }

        let checker = checker.with_text_settings(TextSettings {
            english_stop_words: self.english_stop_words,
            ..TextSettings::default()
        });
        checker.validate()?;
        Ok(checker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CheckerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = CheckerConfig::default().with_threshold(1.5);
        assert_eq!(config.validate(), Err(ConfigError::Threshold(1.5)));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = CheckerConfig::default().with_max_workers(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn test_stop_word_set_includes_english_when_enabled() {
        let settings = TextSettings::default();
        let set = settings.stop_word_set();
        assert!(set.contains("安装"));
        assert!(set.contains("the"));

        let settings = TextSettings {
            english_stop_words: false,
            ..TextSettings::default()
        };
        assert!(!settings.stop_word_set().contains("the"));
    }

    #[test]
    fn test_checker_carries_english_stop_word_switch() {
        let config = Config {
            homework_dir: PathBuf::from("homework"),
            output_dir: PathBuf::from("plagiarism_results"),
            similarity_threshold: 0.8,
            max_workers: 2,
            weights: None,
            patterns_file: None,
            english_stop_words: false,
        };
        let checker = config.checker().unwrap();
        assert!(!checker.text.english_stop_words);
        assert_eq!(checker.text.stop_words, TextSettings::default().stop_words);
        assert_eq!(checker.similarity_threshold, 0.8);
    }
}
