//! Response shapes returned to callers.

use serde::{Deserialize, Serialize};

/// One matching path in a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Path of the matching leaf
    pub path: String,
    /// First snippet for the path
    pub value: String,
    /// Occurrences at the path
    pub count: usize,
}

/// One record in a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Display title
    pub title: String,
    /// Record slug
    pub slug: String,
    /// Page type, `Blog`, or collection key the record came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// Matches in traversal order; empty for a negated search
    pub matches: Vec<SearchMatch>,
}

/// Result of a search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Whether the request produced a result set
    pub success: bool,
    /// Matching records, ordered by slug
    pub results: Vec<SearchResult>,
    /// Number of records examined
    pub total_items: Option<usize>,
    /// Labels of scopes whose fetch failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_scopes: Vec<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Successful response with no results and nothing examined.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            success: true,
            results: Vec::new(),
            total_items: Some(0),
            failed_scopes: Vec::new(),
            error: None,
        }
    }

    /// Failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>, failed_scopes: Vec<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            total_items: None,
            failed_scopes,
            error: Some(error.into()),
        }
    }
}

/// One pattern occurrence group in an audit finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditIssue {
    /// Catalog pattern that matched
    pub pattern: String,
    /// Path of the matching leaf
    pub path: String,
    /// First snippet for the path
    pub value: String,
    /// Occurrences at the path
    pub count: usize,
}

/// One record in an audit response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFinding {
    /// Display title
    pub title: String,
    /// Record slug
    pub slug: String,
    /// Page type, `Blog`, or collection key the record came from
    pub source_type: String,
    /// Issues ordered by pattern, then path
    pub issues: Vec<AuditIssue>,
}

impl AuditFinding {
    /// Sum of issue counts.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.iter().map(|issue| issue.count).sum()
    }
}

/// Result of an audit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    /// Whether the request produced a result set
    pub success: bool,
    /// Records with findings, ordered by slug
    pub results: Vec<AuditFinding>,
    /// Sum of all issue counts
    pub total_issues: usize,
    /// Sorted distinct patterns with at least one finding
    pub patterns_found: Vec<String>,
    /// Labels of scopes whose fetch failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_scopes: Vec<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditResponse {
    /// Failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>, failed_scopes: Vec<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            total_issues: 0,
            patterns_found: Vec::new(),
            failed_scopes,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_shape() {
        let response = SearchResponse {
            success: true,
            results: vec![SearchResult {
                title: "Home".to_string(),
                slug: "home".to_string(),
                source_type: Some("landing".to_string()),
                matches: vec![SearchMatch {
                    path: "fields.title".to_string(),
                    value: "Acme home".to_string(),
                    count: 1,
                }],
            }],
            total_items: Some(4),
            failed_scopes: Vec::new(),
            error: None,
        };

        let value = serde_json::to_value(&response).expect("serialize response");
        assert_eq!(
            value,
            json!({
                "success": true,
                "results": [{
                    "title": "Home",
                    "slug": "home",
                    "sourceType": "landing",
                    "matches": [{ "path": "fields.title", "value": "Acme home", "count": 1 }]
                }],
                "totalItems": 4
            })
        );
    }

    #[test]
    fn test_failure_shapes() {
        let search = serde_json::to_value(SearchResponse::failure(
            "boom",
            vec!["Blog".to_string()],
        ))
        .expect("serialize search failure");
        assert_eq!(
            search,
            json!({
                "success": false,
                "results": [],
                "totalItems": null,
                "failedScopes": ["Blog"],
                "error": "boom"
            })
        );

        let audit = serde_json::to_value(AuditResponse::failure("boom", Vec::new()))
            .expect("serialize audit failure");
        assert_eq!(audit["totalIssues"], 0);
        assert_eq!(audit["patternsFound"], json!([]));
        assert!(audit.get("failedScopes").is_none());
    }

    #[test]
    fn test_issue_count() {
        let finding = AuditFinding {
            title: "t".to_string(),
            slug: "s".to_string(),
            source_type: "Blog".to_string(),
            issues: vec![
                AuditIssue {
                    pattern: "mso-".to_string(),
                    path: "body".to_string(),
                    value: "mso-x".to_string(),
                    count: 2,
                },
                AuditIssue {
                    pattern: "onclick=".to_string(),
                    path: "body".to_string(),
                    value: "onclick=x".to_string(),
                    count: 3,
                },
            ],
        };
        assert_eq!(finding.issue_count(), 5);
    }
}
