//! Vitrine Scraper - product page extraction engine.
//!
//! Turns store product pages into validated [`ProductRecord`]s. Every field
//! is located through an ordered list of fallback probes tuned to the store's
//! markup, and every failure is classified as one of the [`ErrorKind`]s.
//!
//! # Features
//!
//! - Single-URL extraction with URL validation before any network I/O
//! - Sequential batch extraction with per-URL failure isolation
//! - Injectable HTTP fetcher and clock for deterministic tests
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_core::AppConfig;
//!
//! let config = AppConfig::load_with_env()?;
//! let record = vitrine_scraper::extract_one("https://panini.com.br/berserk-vol-1", &config).await?;
//! println!("{} R$ {:.2}", record.title(), record.current_price());
//!
//! let batch = vitrine_scraper::extract_many(&urls, &config).await;
//! println!("{} of {} extracted", batch.success_count(), batch.total_processed());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod assembler;
#[allow(missing_docs)]
pub mod clock;
#[allow(missing_docs)]
pub mod document;
#[allow(missing_docs)]
pub mod error;
#[allow(missing_docs)]
pub mod extract;
pub mod orchestrator;
pub mod pipeline;
#[allow(missing_docs)]
pub mod probe;
#[allow(missing_docs)]
pub mod product_url;
#[allow(missing_docs)]
pub mod selectors;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{Document, Element};
pub use error::{ErrorKind, ExtractError, Field, Result, ScrapeError};
pub use orchestrator::{BatchFailure, BatchOrchestrator, BatchResult, BatchSuccess};
pub use pipeline::ProductExtractor;
pub use product_url::{normalize_url, ProductUrlRule};
pub use vitrine_core::ProductRecord;

use std::sync::Arc;
use tracing::error;
use vitrine_core::AppConfig;
use vitrine_fetch::HttpFetcher;

/// Build an extractor backed by a real HTTP client, for reuse across calls.
pub fn make_reusable_extractor(config: &AppConfig) -> vitrine_fetch::Result<ProductExtractor> {
    let fetcher = HttpFetcher::new(&config.http)?;
    Ok(ProductExtractor::new(Arc::new(fetcher), config.site.clone()))
}

/// Extract a single product page.
///
/// An invalid URL is reported as such even when the HTTP client cannot be
/// built.
pub async fn extract_one(url: &str, config: &AppConfig) -> Result<ProductRecord> {
    let extractor = match make_reusable_extractor(config) {
        Ok(extractor) => extractor,
        Err(e) => {
            ProductUrlRule::new(&config.site.domain).validate(url)?;
            error!("Could not build HTTP client: {}", e);
            return Err(ScrapeError::scraping_failed(url, e.to_string()));
        }
    };
    extractor.extract(url).await
}

/// Extract many product pages in order. Never fails as a whole.
pub async fn extract_many<S: AsRef<str>>(urls: &[S], config: &AppConfig) -> BatchResult {
    match make_reusable_extractor(config) {
        Ok(extractor) => BatchOrchestrator::new(extractor).run(urls).await,
        Err(e) => {
            error!("Could not build HTTP client: {}", e);
            let rule = ProductUrlRule::new(&config.site.domain);
            let cause = e.to_string();
            orchestrator::all_failed(
                urls.iter()
                    .map(|url| orchestrator::failure_without_extractor(&rule, url.as_ref(), &cause))
                    .collect(),
            )
        }
    }
}
