//! Scope selection for a search or audit request.

use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;
use sweeper_core::{CollectionKey, PageType, Scope, SourceConfig, SweeperError};

/// The sources one request should query, plus fetch options.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeRequest {
    /// Read token for the content source
    #[serde(skip_serializing)]
    pub token: String,
    /// Fetch preview (draft) content
    pub preview: bool,
    /// Page types to query, each fetched separately
    pub page_types: Vec<String>,
    /// Named collections to query, each fetched separately
    pub collection_keys: Vec<String>,
    /// Whether to query the blog
    pub include_blog: bool,
}

impl ScopeRequest {
    /// Empty selection using the given token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Empty selection using the token and preview flag from configuration.
    #[must_use]
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            token: config.api_token.clone().unwrap_or_default(),
            preview: config.preview,
            ..Self::default()
        }
    }

    /// Add a page type.
    #[must_use]
    pub fn with_page_type(mut self, page_type: impl Into<String>) -> Self {
        self.page_types.push(page_type.into());
        self
    }

    /// Add a collection key.
    #[must_use]
    pub fn with_collection(mut self, key: impl Into<String>) -> Self {
        self.collection_keys.push(key.into());
        self
    }

    /// Include the blog.
    #[must_use]
    pub fn with_blog(mut self) -> Self {
        self.include_blog = true;
        self
    }

    /// Set the preview flag.
    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Whether anything at all was selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.page_types.is_empty() || !self.collection_keys.is_empty() || self.include_blog
    }

    /// Validate the selection into scopes: page types, then the blog, then
    /// collections.
    ///
    /// # Errors
    /// Returns [`ScanError::NoScopeSelected`] for an empty selection,
    /// [`ScanError::MissingToken`] without a token and
    /// [`ScanError::InvalidScope`] for a malformed page type or key.
    pub fn scopes(&self) -> Result<Vec<Scope>> {
        if !self.has_selection() {
            return Err(ScanError::NoScopeSelected);
        }
        if self.token.trim().is_empty() {
            return Err(ScanError::MissingToken);
        }

        let mut scopes = Vec::with_capacity(
            self.page_types.len() + self.collection_keys.len() + usize::from(self.include_blog),
        );
        for page_type in &self.page_types {
            scopes.push(Scope::PageType(
                PageType::new(page_type.as_str()).map_err(invalid_scope)?,
            ));
        }
        if self.include_blog {
            scopes.push(Scope::Blog);
        }
        for key in &self.collection_keys {
            scopes.push(Scope::Collection(
                CollectionKey::new(key.as_str()).map_err(invalid_scope)?,
            ));
        }
        Ok(scopes)
    }
}

fn invalid_scope(err: SweeperError) -> ScanError {
    match err {
        SweeperError::Validation(reason) => ScanError::InvalidScope { reason },
        other => ScanError::Core(other),
    }
}

impl fmt::Debug for ScopeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeRequest")
            .field("token", &"<redacted>")
            .field("preview", &self.preview)
            .field("page_types", &self.page_types)
            .field("collection_keys", &self.collection_keys)
            .field("include_blog", &self.include_blog)
            .finish()
    }
}
