//! Batch extraction with per-URL failure isolation.
//!
//! URLs are processed one at a time in input order. A failing URL, including
//! one whose extraction panics, becomes an entry in
//! [`BatchResult::failures`] and never stops the batch.

use crate::error::{ErrorKind, ScrapeError};
use crate::pipeline::ProductExtractor;
use crate::product_url::ProductUrlRule;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info, warn};
use vitrine_core::ProductRecord;

/// A successfully extracted URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSuccess {
    /// URL as given by the caller
    pub url: String,
    /// Extracted record
    pub record: ProductRecord,
}

/// A URL that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// URL as given by the caller
    pub url: String,
    /// Failure classification
    pub kind: ErrorKind,
    /// Human-readable cause
    pub message: String,
    /// Transport status code, if the server answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<ScrapeError> for BatchFailure {
    fn from(err: ScrapeError) -> Self {
        Self {
            url: err.url().to_string(),
            kind: err.kind(),
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a batch. Counts always agree with the two lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    successes: Vec<BatchSuccess>,
    failures: Vec<BatchFailure>,
    total_processed: usize,
    success_count: usize,
    failure_count: usize,
}

impl BatchResult {
    fn new(successes: Vec<BatchSuccess>, failures: Vec<BatchFailure>) -> Self {
        Self {
            total_processed: successes.len() + failures.len(),
            success_count: successes.len(),
            failure_count: failures.len(),
            successes,
            failures,
        }
    }

    /// Successful extractions in input order.
    #[must_use]
    pub fn successes(&self) -> &[BatchSuccess] {
        &self.successes
    }

    /// Failed extractions in input order.
    #[must_use]
    pub fn failures(&self) -> &[BatchFailure] {
        &self.failures
    }

    /// Number of URLs processed.
    #[must_use]
    pub fn total_processed(&self) -> usize {
        self.total_processed
    }

    /// Number of successful extractions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.success_count
    }

    /// Number of failed extractions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    /// Whether every URL was extracted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failure_count == 0
    }
}

/// Runs extractions sequentially over a list of URLs.
pub struct BatchOrchestrator {
    extractor: ProductExtractor,
}

impl BatchOrchestrator {
    /// Create an orchestrator around a reusable extractor.
    #[must_use]
    pub fn new(extractor: ProductExtractor) -> Self {
        Self { extractor }
    }

    /// Extract every URL in order. Never fails as a whole.
    pub async fn run<S: AsRef<str>>(&self, urls: &[S]) -> BatchResult {
        let started = Instant::now();
        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for url in urls {
            let url = url.as_ref();
            match self.extract_isolated(url).await {
                Ok(record) => successes.push(BatchSuccess {
                    url: url.to_string(),
                    record,
                }),
                Err(e) => {
                    warn!("Batch item {} failed: {}", url, e);
                    failures.push(BatchFailure::from(e));
                }
            }
        }

        let result = BatchResult::new(successes, failures);
        info!(
            "Batch finished: {} processed, {} succeeded, {} failed in {}ms",
            result.total_processed,
            result.success_count,
            result.failure_count,
            started.elapsed().as_millis()
        );
        result
    }

    /// Run one extraction, turning a panic into `ScrapingFailed`.
    async fn extract_isolated(&self, url: &str) -> Result<ProductRecord, ScrapeError> {
        match AssertUnwindSafe(self.extractor.extract(url)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Extraction of {} panicked: {}", url, message);
                Err(ScrapeError::scraping_failed(
                    url,
                    format!("extraction panicked: {message}"),
                ))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Failure for a URL that never reached an extractor because none could be
/// built. Invalid URLs keep their own classification.
pub(crate) fn failure_without_extractor(rule: &ProductUrlRule, url: &str, cause: &str) -> BatchFailure {
    match rule.validate(url) {
        Err(e) => BatchFailure::from(e),
        Ok(()) => BatchFailure::from(ScrapeError::scraping_failed(url, cause)),
    }
}

/// Batch result with no successes.
pub(crate) fn all_failed(failures: Vec<BatchFailure>) -> BatchResult {
    BatchResult::new(Vec::new(), failures)
}
