//! Scope orchestration for search and audit requests.
//!
//! This module provides the `ContentScanner`, which fetches every selected
//! scope concurrently, runs the matching engine over the fetched records,
//! and assembles the ordered response.

use crate::catalog::PatternCatalog;
use crate::dedup::audit_record;
use crate::error::{Result, ScanError};
use crate::locate::Target;
use crate::response::{
    AuditFinding, AuditIssue, AuditResponse, SearchMatch, SearchResponse, SearchResult,
};
use crate::scope::ScopeRequest;
use crate::source::{fetch_scope, ContentSource};
use crate::walker::{walk, WalkLimits};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use sweeper_core::{AppConfig, Record, Scope};
use tokio_util::sync::CancellationToken;

/// Records fetched from one scope.
#[derive(Debug, Clone)]
struct ScopeBatch {
    scope: Scope,
    records: Vec<Record>,
}

/// Outcome of fetching every selected scope.
#[derive(Debug, Default)]
struct Fetched {
    batches: Vec<ScopeBatch>,
    failed_scopes: Vec<String>,
}

impl Fetched {
    fn record_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.records.len()).sum()
    }
}

/// Runs searches and audits across content scopes.
pub struct ContentScanner {
    /// Fetch collaborator
    source: Arc<dyn ContentSource>,
    /// Pattern catalog used by audits
    catalog: Arc<PatternCatalog>,
    /// Traversal bounds
    limits: WalkLimits,
    /// Maximum concurrent scope fetches
    max_concurrent_fetches: usize,
}

impl ContentScanner {
    /// Create a scanner using the built-in pattern catalog.
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, config: &AppConfig) -> Self {
        Self {
            source,
            catalog: PatternCatalog::builtin(),
            limits: WalkLimits::from(&config.scanning),
            max_concurrent_fetches: config.source.max_concurrent_fetches.max(1),
        }
    }

    /// Create a scanner with default configuration.
    #[must_use]
    pub fn with_defaults(source: Arc<dyn ContentSource>) -> Self {
        Self::new(source, &AppConfig::default())
    }

    /// Set the maximum number of concurrent scope fetches.
    #[must_use]
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// Replace the audit pattern catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: PatternCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// Replace the traversal bounds. At least one snippet is kept per path.
    #[must_use]
    pub fn with_limits(mut self, mut limits: WalkLimits) -> Self {
        limits.snippets.max_snippets = limits.snippets.max_snippets.max(1);
        self.limits = limits;
        self
    }

    /// Search every selected scope for `term`.
    ///
    /// With `negate`, only records that do not contain the term are
    /// returned, each with an empty match list.
    pub async fn search(&self, term: &str, request: &ScopeRequest, negate: bool) -> SearchResponse {
        let cancel = CancellationToken::new();
        match self.search_cancellable(term, request, negate, &cancel).await {
            Ok(response) => response,
            Err(e) => SearchResponse::failure(e.to_string(), Vec::new()),
        }
    }

    /// [`search`](Self::search) that stops when `cancel` fires.
    ///
    /// # Errors
    /// Returns [`ScanError::Cancelled`] if cancelled; in-flight fetches are
    /// dropped and no partial results are returned. Every other failure is
    /// reported inside the response.
    pub async fn search_cancellable(
        &self,
        term: &str,
        request: &ScopeRequest,
        negate: bool,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse> {
        let scopes = match request.scopes() {
            Ok(scopes) => scopes,
            Err(e) => {
                tracing::warn!("Rejected search request: {}", e);
                return Ok(SearchResponse::failure(e.to_string(), Vec::new()));
            }
        };

        let target = Target::new(term);
        if target.is_blank() {
            tracing::debug!("Empty search term, nothing to fetch");
            return Ok(SearchResponse::empty());
        }

        let fetched = match self.fetch_all(&scopes, request, cancel).await {
            Ok(fetched) => fetched,
            Err(ScanError::AllScopesFailed { failed_scopes }) => {
                let message = ScanError::AllScopesFailed {
                    failed_scopes: failed_scopes.clone(),
                }
                .to_string();
                tracing::error!("Search failed: {}", message);
                return Ok(SearchResponse::failure(message, failed_scopes));
            }
            Err(e) => return Err(e),
        };

        let total_items = fetched.record_count();
        let failed_scopes = fetched.failed_scopes;
        let batches = fetched.batches;
        let limits = self.limits;

        let results = tokio::task::spawn_blocking(move || {
            search_batches(&batches, &target, &limits, negate)
        })
        .await
        .map_err(|e| ScanError::Core(sweeper_core::SweeperError::Internal(e.to_string())))?;

        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        tracing::info!(
            term,
            negate,
            total_items,
            results = results.len(),
            failed = failed_scopes.len(),
            "search complete"
        );

        Ok(SearchResponse {
            success: true,
            results,
            total_items: Some(total_items),
            failed_scopes,
            error: None,
        })
    }

    /// Audit every selected scope against the pattern catalog.
    pub async fn audit(&self, request: &ScopeRequest) -> AuditResponse {
        let cancel = CancellationToken::new();
        match self.audit_cancellable(request, &cancel).await {
            Ok(response) => response,
            Err(e) => AuditResponse::failure(e.to_string(), Vec::new()),
        }
    }

    /// [`audit`](Self::audit) that stops when `cancel` fires.
    ///
    /// # Errors
    /// Returns [`ScanError::Cancelled`] if cancelled. Every other failure is
    /// reported inside the response.
    pub async fn audit_cancellable(
        &self,
        request: &ScopeRequest,
        cancel: &CancellationToken,
    ) -> Result<AuditResponse> {
        let scopes = match request.scopes() {
            Ok(scopes) => scopes,
            Err(e) => {
                tracing::warn!("Rejected audit request: {}", e);
                return Ok(AuditResponse::failure(e.to_string(), Vec::new()));
            }
        };

        let fetched = match self.fetch_all(&scopes, request, cancel).await {
            Ok(fetched) => fetched,
            Err(ScanError::AllScopesFailed { failed_scopes }) => {
                let message = ScanError::AllScopesFailed {
                    failed_scopes: failed_scopes.clone(),
                }
                .to_string();
                tracing::error!("Audit failed: {}", message);
                return Ok(AuditResponse::failure(message, failed_scopes));
            }
            Err(e) => return Err(e),
        };

        let records = fetched.record_count();
        let failed_scopes = fetched.failed_scopes;
        let batches = fetched.batches;
        let catalog = Arc::clone(&self.catalog);
        let limits = self.limits;

        let results =
            tokio::task::spawn_blocking(move || audit_batches(&batches, &catalog, &limits))
                .await
                .map_err(|e| ScanError::Core(sweeper_core::SweeperError::Internal(e.to_string())))?;

        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let total_issues: usize = results.iter().map(AuditFinding::issue_count).sum();
        let patterns_found: Vec<String> = results
            .iter()
            .flat_map(|finding| finding.issues.iter().map(|issue| issue.pattern.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        tracing::info!(
            records,
            findings = results.len(),
            total_issues,
            patterns = patterns_found.len(),
            failed = failed_scopes.len(),
            "audit complete"
        );

        Ok(AuditResponse {
            success: true,
            results,
            total_issues,
            patterns_found,
            failed_scopes,
            error: None,
        })
    }

    /// Fetch every scope, at most `max_concurrent_fetches` at a time.
    ///
    /// Batches and failures are returned in scope order regardless of
    /// completion order.
    async fn fetch_all(
        &self,
        scopes: &[Scope],
        request: &ScopeRequest,
        cancel: &CancellationToken,
    ) -> Result<Fetched> {
        let source = self.source.as_ref();
        let token = request.token.as_str();
        let preview = request.preview;

        let mut outcomes: Vec<Option<sweeper_core::Result<Vec<Record>>>> =
            scopes.iter().map(|_| None).collect();
        let mut queued = scopes.iter().enumerate();
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < self.max_concurrent_fetches {
                let Some((index, scope)) = queued.next() else {
                    break;
                };
                tracing::debug!("Fetching {}", scope);
                in_flight.push(async move {
                    (index, fetch_scope(source, scope, token, preview).await)
                });
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!("Scan cancelled with {} fetches in flight", in_flight.len());
                    return Err(ScanError::Cancelled);
                }
                Some((index, outcome)) = in_flight.next() => {
                    outcomes[index] = Some(outcome);
                }
            }
        }

        let mut fetched = Fetched::default();
        for (scope, outcome) in scopes.iter().zip(outcomes) {
            match outcome {
                Some(Ok(records)) => {
                    tracing::debug!(scope = %scope, records = records.len(), "fetched scope");
                    fetched.batches.push(ScopeBatch {
                        scope: scope.clone(),
                        records,
                    });
                }
                Some(Err(e)) => {
                    let failure = ScanError::ScopeFailed {
                        scope: scope.label(),
                        message: e.to_string(),
                    };
                    tracing::warn!("{}", failure);
                    fetched.failed_scopes.push(scope.label());
                }
                None => {
                    tracing::warn!("No fetch outcome recorded for {}", scope);
                    fetched.failed_scopes.push(scope.label());
                }
            }
        }

        if fetched.batches.is_empty() {
            return Err(ScanError::AllScopesFailed {
                failed_scopes: fetched.failed_scopes,
            });
        }

        Ok(fetched)
    }
}

/// Match every record against `target`.
fn search_batches(
    batches: &[ScopeBatch],
    target: &Target,
    limits: &WalkLimits,
    negate: bool,
) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for batch in batches {
        let source_type = batch.scope.source_type();
        for record in &batch.records {
            let matches: Vec<SearchMatch> = walk(record, target, limits, None)
                .into_iter()
                .filter(|(_, acc)| !acc.is_blank())
                .map(|(path, acc)| SearchMatch {
                    value: acc.first_snippet().to_string(),
                    count: acc.count,
                    path,
                })
                .collect();

            let include = if negate {
                matches.is_empty()
            } else {
                !matches.is_empty()
            };
            if !include {
                continue;
            }

            results.push(SearchResult {
                title: record.title().to_string(),
                slug: record.slug().to_string(),
                source_type: Some(source_type.clone()),
                matches: if negate { Vec::new() } else { matches },
            });
        }
    }

    results.sort_by(|a, b| a.slug.cmp(&b.slug));
    results
}

/// Audit every record against `catalog`.
fn audit_batches(
    batches: &[ScopeBatch],
    catalog: &PatternCatalog,
    limits: &WalkLimits,
) -> Vec<AuditFinding> {
    let mut findings = Vec::new();

    for batch in batches {
        let source_type = batch.scope.source_type();
        for record in &batch.records {
            let mut issues: Vec<AuditIssue> = audit_record(record, catalog, limits)
                .into_iter()
                .filter(|found| !found.matches.is_blank())
                .map(|found| AuditIssue {
                    value: found.matches.first_snippet().to_string(),
                    count: found.matches.count,
                    pattern: found.pattern,
                    path: found.path,
                })
                .collect();

            if issues.is_empty() {
                continue;
            }
            issues.sort_by(|a, b| a.pattern.cmp(&b.pattern).then_with(|| a.path.cmp(&b.path)));

            findings.push(AuditFinding {
                title: record.title().to_string(),
                slug: record.slug().to_string(),
                source_type: source_type.clone(),
                issues,
            });
        }
    }

    findings.sort_by(|a, b| a.slug.cmp(&b.slug));
    findings
}
