mod common;

use common::{arc, init_tracing, MockSource};
use serde_json::json;
use sweeper_core::AppConfig;
use sweeper_scanner::{ContentScanner, PatternCatalog, ScanError, ScopeRequest};
use tokio_util::sync::CancellationToken;

fn request() -> ScopeRequest {
    ScopeRequest::new("read-token")
}

#[tokio::test]
async fn test_audit_reports_pasted_markup() {
    init_tracing();
    let source = arc(
        MockSource::new()
            .with_records(
                "Page Type: landing",
                vec![
                    json!({
                        "name": "Home",
                        "slug": "home",
                        "fields": {
                            "body": "<p class=\"MsoNormal\" style=\"mso-bidi-font-family:Calibri\">Hi</p>"
                        }
                    }),
                    json!({"name": "Clean", "slug": "clean", "fields": {"body": "<p>Hi</p>"}}),
                ],
            )
            .with_records(
                "Collection: faq",
                vec![json!({"slug": "faq-1", "answer": "<a onclick=\"x()\">more</a>"})],
            ),
    );
    let scanner = ContentScanner::new(source.clone(), &AppConfig::default());

    let response = scanner
        .audit(&request().with_page_type("landing").with_collection("faq"))
        .await;

    assert!(response.success);
    let slugs: Vec<&str> = response.results.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["faq-1", "home"]);

    let faq = &response.results[0];
    assert_eq!(faq.source_type, "faq");
    assert_eq!(faq.title, "faq-1");
    assert_eq!(faq.issues.len(), 1);
    assert_eq!(faq.issues[0].pattern, "onclick=");
    assert_eq!(faq.issues[0].path, "answer");

    let home = &response.results[1];
    assert_eq!(home.source_type, "landing");
    let patterns: Vec<&str> = home.issues.iter().map(|i| i.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["class=\"Mso", "mso-"]);

    assert_eq!(response.total_issues, 3);
    assert_eq!(
        response.patterns_found,
        vec!["class=\"Mso".to_string(), "mso-".to_string(), "onclick=".to_string()]
    );
}

#[tokio::test]
async fn test_audit_does_not_double_count_generic_prefix() {
    let source = arc(MockSource::new().with_records(
        "Blog",
        vec![json!({
            "slug": "post",
            "body": "<span data-contrast=\"auto\" data-ccp-props=\"{}\" data-custom=\"1\">x</span>"
        })],
    ));
    let scanner = ContentScanner::new(source.clone(), &AppConfig::default());

    let response = scanner.audit(&request().with_blog()).await;

    let issues = &response.results[0].issues;
    let summary: Vec<(&str, usize)> = issues
        .iter()
        .map(|i| (i.pattern.as_str(), i.count))
        .collect();
    assert_eq!(
        summary,
        vec![("data-", 1), ("data-ccp-props", 1), ("data-contrast", 1)]
    );
    assert_eq!(response.total_issues, 3);
}

#[tokio::test]
async fn test_audit_with_custom_catalog() {
    let source = arc(MockSource::new().with_records(
        "Page Type: landing",
        vec![json!({"slug": "home", "body": "Draft: replace lorem ipsum"})],
    ));
    let scanner = ContentScanner::new(source.clone(), &AppConfig::default())
        .with_catalog(PatternCatalog::new(["lorem ipsum"]));

    let response = scanner.audit(&request().with_page_type("landing")).await;

    assert_eq!(response.patterns_found, vec!["lorem ipsum".to_string()]);
    assert_eq!(response.results[0].issues[0].value, "Draft: replace lorem ipsum");
}

#[tokio::test]
async fn test_audit_partial_and_total_failure() {
    let partial = arc(
        MockSource::new()
            .with_records("Blog", vec![json!({"slug": "p", "body": "<o:p></o:p>"})])
            .failing("Collection: faq"),
    );
    let response = ContentScanner::new(partial.clone(), &AppConfig::default())
        .audit(&request().with_blog().with_collection("faq"))
        .await;
    assert!(response.success);
    assert_eq!(response.failed_scopes, vec!["Collection: faq".to_string()]);
    assert_eq!(response.results.len(), 1);

    let total = arc(MockSource::new().failing("Blog"));
    let response = ContentScanner::new(total.clone(), &AppConfig::default())
        .audit(&request().with_blog())
        .await;
    assert!(!response.success);
    assert_eq!(response.failed_scopes, vec!["Blog".to_string()]);
    assert_eq!(response.total_issues, 0);
}

#[tokio::test]
async fn test_audit_no_scope_selected() {
    let source = arc(MockSource::new());
    let response = ContentScanner::new(source.clone(), &AppConfig::default())
        .audit(&request())
        .await;
    assert!(!response.success);
    assert!(response.error.is_some());
}

#[tokio::test]
async fn test_audit_cancelled() {
    let source = arc(MockSource::new().hanging());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = ContentScanner::new(source.clone(), &AppConfig::default())
        .audit_cancellable(&request().with_blog(), &cancel)
        .await;
    assert!(matches!(result, Err(ScanError::Cancelled)));
}
