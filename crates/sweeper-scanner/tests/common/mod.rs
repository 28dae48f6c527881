#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sweeper_core::{CollectionKey, PageType, Record, Result, Scope, SweeperError};
use sweeper_scanner::ContentSource;

/// In-memory content source keyed by scope label.
#[derive(Default)]
pub struct MockSource {
    records: HashMap<String, Vec<Value>>,
    failing: HashSet<String>,
    hanging: bool,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, scope: &str, records: Vec<Value>) -> Self {
        self.records.insert(scope.to_string(), records);
        self
    }

    pub fn failing(mut self, scope: &str) -> Self {
        self.failing.insert(scope.to_string());
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hanging = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn serve(&self, scope: Scope) -> Result<Vec<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if self.hanging {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let label = scope.label();
        if self.failing.contains(&label) {
            return Err(SweeperError::Source(format!("HTTP 500 for {label}")));
        }
        Ok(self
            .records
            .get(&label)
            .map(|values| values.iter().map(Record::from_json).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch_pages(
        &self,
        _token: &str,
        page_type: &PageType,
        _preview: bool,
    ) -> Result<Vec<Record>> {
        self.serve(Scope::PageType(page_type.clone())).await
    }

    async fn fetch_posts(&self, _token: &str, _preview: bool) -> Result<Vec<Record>> {
        self.serve(Scope::Blog).await
    }

    async fn fetch_collection(
        &self,
        _token: &str,
        key: &CollectionKey,
        _preview: bool,
    ) -> Result<Vec<Record>> {
        self.serve(Scope::Collection(key.clone())).await
    }
}

pub fn arc(source: MockSource) -> Arc<MockSource> {
    Arc::new(source)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
