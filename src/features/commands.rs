// Declarative shell-command pattern table.
//
// Each entry names a family of Linux commands and the regex that recognizes
// an invocation of it in running text. The extractor only iterates the table,
// so new command families are added here (or supplied through a JSON file)
// without touching the extraction algorithm.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One row of the pattern table, in its uncompiled (config file) form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPatternSpec {
    /// Short identifier, used in diagnostics and the `patterns` listing
    pub name: String,
    /// Loose grouping (privilege, filesystem, storage, ...)
    pub category: String,
    /// Regex matched case-insensitively against document text
    pub pattern: String,
}

impl CommandPatternSpec {
    pub fn new(name: &str, category: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

/// The built-in table: common commands from Linux administration homework.
pub fn default_pattern_specs() -> Vec<CommandPatternSpec> {
    vec![
        CommandPatternSpec::new("sudo", "privilege", r"\bsudo[ \t]+\w+[^\n]*"),
        CommandPatternSpec::new(
            "coreutils",
            "filesystem",
            r"\b(?:ls|cd|mkdir|chmod|chown|grep|find|ps|kill|top|df|du|mount|umount)[ \t]+[^\n]*",
        ),
        CommandPatternSpec::new("systemctl", "service", r"\bsystemctl[ \t]+[^\n]*"),
        CommandPatternSpec::new("adduser", "account", r"\badduser[ \t]+[^\n]*"),
        CommandPatternSpec::new("usermod", "account", r"\busermod[ \t]+[^\n]*"),
        CommandPatternSpec::new("fdisk", "storage", r"\bfdisk[ \t]+[^\n]*"),
        CommandPatternSpec::new("lvm", "storage", r"\blvm\w*[ \t]+[^\n]*"),
        CommandPatternSpec::new("nano", "editor", r"\bnano[ \t]+[^\n]*"),
        CommandPatternSpec::new("vim", "editor", r"\bvim[ \t]+[^\n]*"),
        CommandPatternSpec::new("pvcreate", "storage", r"\bpvcreate[ \t]+[^\n]*"),
        CommandPatternSpec::new("vgcreate", "storage", r"\bvgcreate[ \t]+[^\n]*"),
        CommandPatternSpec::new("lvcreate", "storage", r"\blvcreate[ \t]+[^\n]*"),
        CommandPatternSpec::new("lvextend", "storage", r"\blvextend[ \t]+[^\n]*"),
        CommandPatternSpec::new("resize2fs", "storage", r"\bresize2fs[ \t]+[^\n]*"),
    ]
}

/// A compiled table row.
#[derive(Debug, Clone)]
pub struct CommandPattern {
    pub name: String,
    pub category: String,
    source: String,
    regex: Regex,
}

impl CommandPattern {
    /// Compile a spec. Matching is always case-insensitive.
    pub fn compile(spec: &CommandPatternSpec) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("(?i){}", spec.pattern)).map_err(|e| {
            ConfigError::InvalidPattern {
                name: spec.name.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            name: spec.name.clone(),
            category: spec.category.clone(),
            source: spec.pattern.clone(),
            regex,
        })
    }

    /// The pattern text as configured (without the case-insensitive flag).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All non-overlapping matches of this pattern in `text`.
    pub fn find_all<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.regex.find_iter(text).map(|m| m.as_str())
    }
}

/// Ordered collection of compiled command patterns.
#[derive(Debug, Clone)]
pub struct CommandPatternTable {
    patterns: Vec<CommandPattern>,
}

impl CommandPatternTable {
    /// Compile every spec, failing on the first invalid one.
    pub fn compile(specs: &[CommandPatternSpec]) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::NoPatterns);
        }
        let patterns = specs
            .iter()
            .map(CommandPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Parse a JSON array of `{name, category, pattern}` objects and compile it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let specs: Vec<CommandPatternSpec> =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidPattern {
                name: "<pattern file>".to_string(),
                reason: e.to_string(),
            })?;
        Self::compile(&specs)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Every match of every pattern, in table order.
    pub fn find_all<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.patterns.iter().flat_map(move |p| p.find_all(text))
    }
}

impl Default for CommandPatternTable {
    fn default() -> Self {
        // The built-in table is a constant; failing to compile it is a programmer error.
        Self::compile(&default_pattern_specs()).expect("built-in command pattern is invalid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_compiles() {
        let table = CommandPatternTable::default();
        assert_eq!(table.len(), default_pattern_specs().len());
    }

    #[test]
    fn test_sudo_match_is_case_insensitive() {
        let table = CommandPatternTable::default();
        let found: Vec<&str> = table.find_all("then run SUDO apt update").collect();
        assert_eq!(found, vec!["SUDO apt update"]);
    }

    #[test]
    fn test_word_boundary_blocks_embedded_names() {
        let table = CommandPatternTable::default();
        // "tools" contains "ls", "pscp" starts with "ps"
        assert_eq!(table.find_all("these tools help").count(), 0);
        assert_eq!(table.find_all("pscp file host").count(), 0);
    }

    #[test]
    fn test_match_stops_at_line_end() {
        let table = CommandPatternTable::default();
        let found: Vec<&str> = table.find_all("ls -la\nnext line").collect();
        assert_eq!(found, vec!["ls -la"]);
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(
            CommandPatternTable::compile(&[]).unwrap_err(),
            ConfigError::NoPatterns
        );
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let specs = vec![CommandPatternSpec::new("broken", "test", "(unclosed")];
        let err = CommandPatternTable::compile(&specs).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{"name": "apt", "category": "package", "pattern": "\\bapt[ \\t]+[^\\n]*"}]"#;
        let table = CommandPatternTable::from_json(json).unwrap();
        assert_eq!(table.len(), 1);
        let found: Vec<&str> = table.find_all("apt install curl").collect();
        assert_eq!(found, vec!["apt install curl"]);
    }
}
