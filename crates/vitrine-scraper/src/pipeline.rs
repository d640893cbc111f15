//! Single-URL extraction: validate, normalize, fetch, parse, assemble.

use crate::assembler::assemble;
use crate::clock::{Clock, SystemClock};
use crate::document::Document;
use crate::error::{ExtractError, Result, ScrapeError};
use crate::extract::FieldExtractors;
use crate::product_url::{normalize_url, ProductUrlRule};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use vitrine_core::{ProductRecord, SiteConfig};
use vitrine_fetch::HtmlFetcher;

/// Extracts product records from store pages.
///
/// Cheap to clone; clones share the fetcher and clock.
#[derive(Clone)]
pub struct ProductExtractor {
    fetcher: Arc<dyn HtmlFetcher>,
    rule: ProductUrlRule,
    fields: FieldExtractors,
}

impl ProductExtractor {
    /// Create an extractor for `site` using the system clock.
    #[must_use]
    pub fn new(fetcher: Arc<dyn HtmlFetcher>, site: SiteConfig) -> Self {
        Self::with_clock(fetcher, site, Arc::new(SystemClock))
    }

    /// Create an extractor with an explicit clock for synthesized ids.
    #[must_use]
    pub fn with_clock(fetcher: Arc<dyn HtmlFetcher>, site: SiteConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher,
            rule: ProductUrlRule::new(&site.domain),
            fields: FieldExtractors::new(site, clock),
        }
    }

    /// Site this extractor is bound to.
    #[must_use]
    pub fn site(&self) -> &SiteConfig {
        self.fields.site()
    }

    /// Check that `url` is a store URL without fetching it.
    pub fn validate_url(&self, url: &str) -> Result<()> {
        self.rule.validate(url)
    }

    /// Extract the product at `url`.
    ///
    /// # Errors
    /// - [`ScrapeError::InvalidUrl`] before any network I/O
    /// - [`ScrapeError::ProductNotFound`] when the page lacks a title or price
    /// - [`ScrapeError::ScrapingFailed`] for transport and validation failures
    pub async fn extract(&self, url: &str) -> Result<ProductRecord> {
        let started = Instant::now();
        self.rule.validate(url)?;
        let normalized = normalize_url(url);

        debug!("Fetching {}", normalized);
        let html = self.fetcher.fetch(&normalized).await.map_err(|e| {
            warn!("Fetch failed for {}: {}", normalized, e);
            ScrapeError::ScrapingFailed {
                url: url.to_string(),
                message: e.to_string(),
                status: e.status(),
            }
        })?;

        let record = self.extract_html(url, &html)?;
        info!(
            "Extracted '{}' from {} in {}ms",
            record.title(),
            normalized,
            started.elapsed().as_millis()
        );
        Ok(record)
    }

    /// Extract a record from already fetched HTML.
    ///
    /// `url` is validated and used as the record's source URL.
    pub fn extract_html(&self, url: &str, html: &str) -> Result<ProductRecord> {
        self.rule.validate(url)?;
        let normalized = normalize_url(url);
        let doc = Document::parse(html);

        assemble(&self.fields, &doc, &normalized).map_err(|e| match e {
            ExtractError::NotFound(field) => {
                debug!("No {} at {}", field, normalized);
                ScrapeError::ProductNotFound {
                    url: url.to_string(),
                    field,
                }
            }
            ExtractError::InvalidRecord(e) => {
                warn!("Invalid record from {}: {}", normalized, e);
                ScrapeError::scraping_failed(url, e.to_string())
            }
        })
    }
}
