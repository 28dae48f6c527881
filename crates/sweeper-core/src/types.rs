//! Scope identifiers shared across sweeper.
//!
//! Page types and collection keys are validated on construction so that an
//! obviously malformed selection is rejected before any fetch happens.

use crate::error::SweeperError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const MAX_IDENTIFIER_LEN: usize = 100;

fn validate_identifier(kind: &str, id: &str) -> Result<(), SweeperError> {
    static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = IDENTIFIER_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid regex"));

    if id.is_empty() {
        return Err(SweeperError::Validation(format!("{kind} is required")));
    }

    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(SweeperError::Validation(format!(
            "invalid {kind}: must be at most {MAX_IDENTIFIER_LEN} characters, got {} characters",
            id.len()
        )));
    }

    if regex.is_match(id) {
        Ok(())
    } else {
        Err(SweeperError::Validation(format!(
            "invalid {kind}: must contain only letters, digits, '_', '-' or '.', got '{id}'"
        )))
    }
}

/// Newtype for page type identifiers (e.g. `landing_page`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageType(String);

impl PageType {
    /// Create a new `PageType`, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns error if the identifier is empty or malformed.
    pub fn new(id: impl Into<String>) -> Result<Self, SweeperError> {
        let id = id.into().trim().to_string();
        validate_identifier("page type", &id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for named collection keys (e.g. `faq_items`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionKey(String);

impl CollectionKey {
    /// Create a new `CollectionKey`, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns error if the key is empty or malformed.
    pub fn new(key: impl Into<String>) -> Result<Self, SweeperError> {
        let key = key.into().trim().to_string();
        validate_identifier("collection key", &key)?;
        Ok(Self(key))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One independently fetched source of records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Scope {
    /// All pages of one page type
    PageType(PageType),
    /// All blog posts
    Blog,
    /// All items of one named collection
    Collection(CollectionKey),
}

impl Scope {
    /// Human-readable label used when reporting a failed fetch.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Scope::PageType(page_type) => format!("Page Type: {page_type}"),
            Scope::Blog => "Blog".to_string(),
            Scope::Collection(key) => format!("Collection: {key}"),
        }
    }

    /// Source type attributed to every record fetched from this scope.
    #[must_use]
    pub fn source_type(&self) -> String {
        match self {
            Scope::PageType(page_type) => page_type.as_str().to_string(),
            Scope::Blog => "Blog".to_string(),
            Scope::Collection(key) => key.as_str().to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
