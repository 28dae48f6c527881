//! Markup-bloat pattern catalog.
//!
//! A pattern is *generic* when another catalog pattern starts with it
//! (`data-` prefixes `data-contrast`), otherwise it is *specific*. The
//! relation is computed when a catalog is built; the built-in catalog is
//! built once per process.

use crate::locate::Target;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Built-in patterns, grouped by where the markup comes from.
pub const BUILTIN_PATTERNS: &[&str] = &[
    // Office suites (Word, Word Online, Google Docs)
    "mso-",
    "class=\"Mso",
    "<o:p>",
    "<!--[if",
    "xmlns:o=",
    "docs-internal-guid",
    "class=\"TextRun",
    "class=\"NormalTextRun",
    "class=\"EOP",
    "class=\"SCXW",
    "paraid=",
    "paraeid=",
    "data-ccp-props",
    "data-contrast",
    "data-font",
    "data-listid",
    "data-aria-level",
    "data-aria-posinset",
    "data-leveltext",
    "data-sheets-value",
    "data-sheets-userformat",
    // Design tools
    "(figmeta)",
    "(figma)",
    "data-metadata",
    "data-buffer",
    "Apple-interchange-newline",
    "Apple-converted-space",
    "-webkit-",
    // Rich text editors
    "data-pm",
    "data-offset-key",
    "data-block",
    "data-slate",
    "data-mce",
    "data-gramm",
    "contenteditable",
    "data-",
    // Inline script handlers
    "onclick=",
    "onload=",
    "onerror=",
    "onmouseover=",
    "javascript:",
];

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    label: String,
    target: Target,
}

impl Pattern {
    /// The pattern as written in the catalog, used when reporting findings.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Normalized, case-folded pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.target.folded()
    }

    /// Matching form of the pattern.
    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }
}

/// An ordered, de-duplicated set of patterns with the generic relation.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
    generic: BTreeMap<String, Vec<String>>,
}

impl PatternCatalog {
    /// Build a catalog. Patterns are normalized and case-folded; blanks and
    /// duplicates are dropped, first occurrence wins.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<Pattern> = Vec::new();
        for raw in patterns {
            let target = Target::new(raw.as_ref());
            if target.is_blank() || entries.iter().any(|p| p.as_str() == target.folded()) {
                continue;
            }
            entries.push(Pattern {
                label: raw.as_ref().trim().to_string(),
                target,
            });
        }

        let mut generic: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for candidate in &entries {
            let specifics: Vec<String> = entries
                .iter()
                .filter(|other| {
                    other.as_str() != candidate.as_str()
                        && other.as_str().starts_with(candidate.as_str())
                })
                .map(|other| other.as_str().to_string())
                .collect();
            if !specifics.is_empty() {
                generic.insert(candidate.as_str().to_string(), specifics);
            }
        }

        tracing::debug!(
            patterns = entries.len(),
            generic = generic.len(),
            "built pattern catalog"
        );

        Self {
            patterns: entries,
            generic,
        }
    }

    /// The built-in catalog, computed on first use.
    #[must_use]
    pub fn builtin() -> Arc<PatternCatalog> {
        static BUILTIN: OnceLock<Arc<PatternCatalog>> = OnceLock::new();
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(PatternCatalog::new(BUILTIN_PATTERNS))))
    }

    /// All patterns in catalog order.
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the catalog has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `pattern` is a prefix of some other catalog pattern.
    #[must_use]
    pub fn is_generic(&self, pattern: &str) -> bool {
        self.generic.contains_key(pattern)
    }

    /// Patterns that `pattern` prefixes; empty for a specific pattern.
    #[must_use]
    pub fn specifics_of(&self, pattern: &str) -> &[String] {
        self.generic.get(pattern).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Generic patterns in catalog order.
    pub fn generic_patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().filter(|p| self.is_generic(p.as_str()))
    }

    /// Specific patterns in catalog order.
    pub fn specific_patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().filter(|p| !self.is_generic(p.as_str()))
    }
}
