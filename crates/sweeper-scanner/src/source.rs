//! The content source seam.
//!
//! Pagination and retries of transient failures belong to implementations
//! of [`ContentSource`]. A returned error is final for that scope.

use async_trait::async_trait;
use sweeper_core::{CollectionKey, PageType, Record, Result, Scope};

/// Fetches complete, already-paginated record sets.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All pages of one page type.
    ///
    /// # Errors
    /// Returns error once retries are exhausted.
    async fn fetch_pages(&self, token: &str, page_type: &PageType, preview: bool)
        -> Result<Vec<Record>>;

    /// All blog posts.
    ///
    /// # Errors
    /// Returns error once retries are exhausted.
    async fn fetch_posts(&self, token: &str, preview: bool) -> Result<Vec<Record>>;

    /// All items of one named collection.
    ///
    /// # Errors
    /// Returns error once retries are exhausted.
    async fn fetch_collection(
        &self,
        token: &str,
        key: &CollectionKey,
        preview: bool,
    ) -> Result<Vec<Record>>;
}

/// Fetch the records behind one scope.
pub async fn fetch_scope(
    source: &dyn ContentSource,
    scope: &Scope,
    token: &str,
    preview: bool,
) -> Result<Vec<Record>> {
    match scope {
        Scope::PageType(page_type) => source.fetch_pages(token, page_type, preview).await,
        Scope::Blog => source.fetch_posts(token, preview).await,
        Scope::Collection(key) => source.fetch_collection(token, key, preview).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sweeper_core::SweeperError;

    struct Tagged;

    #[async_trait]
    impl ContentSource for Tagged {
        async fn fetch_pages(
            &self,
            _token: &str,
            page_type: &PageType,
            preview: bool,
        ) -> Result<Vec<Record>> {
            Ok(vec![Record::from_json(
                &json!({ "slug": page_type.as_str(), "preview": preview }),
            )])
        }

        async fn fetch_posts(&self, _token: &str, _preview: bool) -> Result<Vec<Record>> {
            Ok(vec![Record::from_json(&json!({ "slug": "post" }))])
        }

        async fn fetch_collection(
            &self,
            _token: &str,
            key: &CollectionKey,
            _preview: bool,
        ) -> Result<Vec<Record>> {
            Err(SweeperError::Source(format!("collection {key} unavailable")))
        }
    }

    #[tokio::test]
    async fn test_fetch_scope_dispatch() {
        let page = Scope::PageType(PageType::new("landing").expect("valid"));
        let records = fetch_scope(&Tagged, &page, "token", true)
            .await
            .expect("pages");
        assert_eq!(records[0].slug(), "landing");

        let posts = fetch_scope(&Tagged, &Scope::Blog, "token", false)
            .await
            .expect("posts");
        assert_eq!(posts[0].slug(), "post");

        let collection = Scope::Collection(CollectionKey::new("faq").expect("valid"));
        let err = fetch_scope(&Tagged, &collection, "token", false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "source error: collection faq unavailable");
    }
}
