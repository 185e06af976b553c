//! The two externally supplied substitution tables.
//!
//! Both tables are TOML files holding an ordered `[[rule]]` array:
//!
//! ```toml
//! [[rule]]
//! pattern = ' \+$'
//! replacement = ""
//! ```
//!
//! The *loop* table holds regex patterns applied to every main line. The
//! *heading* table maps literal AsciiDoc heading markers (`=`, `==`) to their
//! Markdown replacements.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GuideConverterError, Result};

/// Heading replacement used when the heading table has no `=` entry.
const DEFAULT_LEVEL_MARKER: &str = "#";

/// Heading replacement used when the heading table has no `==` entry.
const DEFAULT_SECTION_MARKER: &str = "##";

/// One `pattern = replacement` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl SubstitutionRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// On-disk shape of a table file.
#[derive(Debug, Default, Deserialize)]
struct TableFile {
    #[serde(default)]
    rule: Vec<SubstitutionRule>,
}

/// An ordered pattern → replacement table, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    rules: Vec<SubstitutionRule>,
}

impl SubstitutionTable {
    pub fn new(rules: Vec<SubstitutionRule>) -> Self {
        Self { rules }
    }

    /// Parse a table from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(content)
            .map_err(|e| GuideConverterError::config(format!("invalid substitution table: {e}")))?;
        Ok(Self { rules: file.rule })
    }

    /// Load a table from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GuideConverterError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| {
            GuideConverterError::config(format!("failed to load {}: {e}", path.display()))
        })
    }

    /// Load a table, falling back to `fallback` when the file does not exist.
    pub fn load_or(path: &Path, fallback: Self) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(?path, "substitution table not found, using built-in defaults");
            return Ok(fallback);
        }
        Self::load(path)
    }

    /// Replacement for an exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.pattern == key)
            .map(|r| r.replacement.as_str())
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The heading table used when none is configured: `=` → `#`, `==` → `##`.
    pub fn default_headings() -> Self {
        Self::new(vec![
            SubstitutionRule::new("=", DEFAULT_LEVEL_MARKER),
            SubstitutionRule::new("==", DEFAULT_SECTION_MARKER),
        ])
    }
}

/// Both tables, with the loop patterns compiled.
#[derive(Debug, Clone)]
pub struct Substitutions {
    compiled: Vec<(Regex, String)>,
    headings: SubstitutionTable,
}

impl Substitutions {
    /// Compile the loop table. Fails on the first invalid pattern.
    pub fn new(loop_table: &SubstitutionTable, headings: SubstitutionTable) -> Result<Self> {
        let compiled = loop_table
            .rules()
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.replacement.clone()))
                    .map_err(|e| {
                        GuideConverterError::config(format!(
                            "invalid loop pattern '{}': {e}",
                            rule.pattern
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { compiled, headings })
    }

    /// Load both tables from disk. Missing files fall back to the defaults.
    pub fn load(loop_path: &Path, heading_path: &Path) -> Result<Self> {
        let loop_table = SubstitutionTable::load_or(loop_path, SubstitutionTable::default())?;
        let headings = SubstitutionTable::load_or(heading_path, SubstitutionTable::default_headings())?;

        tracing::debug!(
            loop_rules = loop_table.len(),
            heading_rules = headings.len(),
            "substitution tables loaded"
        );

        Self::new(&loop_table, headings)
    }

    /// Apply every loop pattern, in table order, across the whole line.
    pub fn apply_loop(&self, line: &str) -> String {
        let mut result = line.to_string();
        for (re, replacement) in &self.compiled {
            result = re.replace_all(&result, replacement.as_str()).into_owned();
        }
        result
    }

    /// Markdown replacement for one `=` of a heading marker.
    pub fn level_marker(&self) -> &str {
        self.headings.get("=").unwrap_or(DEFAULT_LEVEL_MARKER)
    }

    /// Markdown replacement for a `==` section marker.
    pub fn section_marker(&self) -> &str {
        self.headings.get("==").unwrap_or(DEFAULT_SECTION_MARKER)
    }
}

impl Default for Substitutions {
    fn default() -> Self {
        Self {
            compiled: Vec::new(),
            headings: SubstitutionTable::default_headings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ordered_rules() {
        let table = SubstitutionTable::from_toml_str(
            r#"
[[rule]]
pattern = "{empty}"
replacement = ""

[[rule]]
pattern = ' \+$'
"#,
        )
        .expect("parse");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[0].pattern, "{empty}");
        assert_eq!(table.rules()[1].replacement, "");
    }

    #[test]
    fn empty_file_is_empty_table() {
        let table = SubstitutionTable::from_toml_str("").expect("parse");
        assert!(table.is_empty());
    }

    #[test]
    fn loop_rules_apply_in_order() {
        let table = SubstitutionTable::new(vec![
            SubstitutionRule::new("Liberty", "OpenLiberty"),
            SubstitutionRule::new("OpenOpen", "Open"),
            SubstitutionRule::new(r" \+$", ""),
        ]);
        let subs = Substitutions::new(&table, SubstitutionTable::default_headings()).unwrap();
        assert_eq!(subs.apply_loop("Open Liberty server +"), "Open OpenLiberty server");
        assert_eq!(subs.apply_loop("OpenLiberty"), "OpenLiberty");
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let table = SubstitutionTable::new(vec![SubstitutionRule::new("([unclosed", "")]);
        let err = Substitutions::new(&table, SubstitutionTable::default()).unwrap_err();
        assert!(err.to_string().contains("invalid loop pattern"));
    }

    #[test]
    fn heading_markers_fall_back_to_defaults() {
        let subs = Substitutions::new(&SubstitutionTable::default(), SubstitutionTable::default())
            .unwrap();
        assert_eq!(subs.level_marker(), "#");
        assert_eq!(subs.section_marker(), "##");

        let custom = SubstitutionTable::new(vec![SubstitutionRule::new("==", "###")]);
        let subs = Substitutions::new(&SubstitutionTable::default(), custom).unwrap();
        assert_eq!(subs.section_marker(), "###");
        assert_eq!(subs.level_marker(), "#");
    }

    #[test]
    fn shipped_tables_load() {
        let config = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../config");
        let subs = Substitutions::load(
            &config.join("loop-replacements.toml"),
            &config.join("heading-replacements.toml"),
        )
        .expect("shipped tables");
        assert_eq!(subs.apply_loop("Press kbd:[Ctrl+C] to stop. +"), "Press **Ctrl+C** to stop.");
        assert_eq!(subs.section_marker(), "##");
    }

    #[test]
    fn missing_file_uses_fallback() {
        let path = Path::new("/nonexistent/heading-replacements.toml");
        let table = SubstitutionTable::load_or(path, SubstitutionTable::default_headings())
            .expect("fallback");
        assert_eq!(table.get("="), Some("#"));
    }
}
