//! Per-field extractors.
//!
//! Each extractor reads one field from a parsed page. Required fields
//! (title, prices) yield `Option`; every other field has a defined default
//! and never fails.

mod availability;
mod details;
mod image;
mod price;
mod title;

pub use details::{split_contributors, url_slug};
pub use image::{is_placeholder, ImageLocator};
pub use price::{parse_price, Prices};

use crate::clock::Clock;
use crate::document::Document;
use std::sync::Arc;
use vitrine_core::SiteConfig;

/// The site-bound set of field extractors.
#[derive(Clone)]
pub struct FieldExtractors {
    site: SiteConfig,
    clock: Arc<dyn Clock>,
    image: ImageLocator,
}

impl FieldExtractors {
    pub fn new(site: SiteConfig, clock: Arc<dyn Clock>) -> Self {
        let image = ImageLocator::new(&site);
        Self { site, clock, image }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn title(&self, doc: &Document) -> Option<String> {
        title::extract_title(doc)
    }

    pub fn prices(&self, doc: &Document) -> Option<Prices> {
        price::extract_prices(doc)
    }

    pub fn is_pre_order(&self, doc: &Document) -> bool {
        availability::extract_is_pre_order(doc)
    }

    pub fn in_stock(&self, doc: &Document) -> bool {
        availability::extract_in_stock(doc)
    }

    pub fn image_url(&self, doc: &Document) -> String {
        self.image.locate(doc)
    }

    pub fn format(&self, doc: &Document) -> String {
        details::extract_format(doc)
    }

    pub fn contributors(&self, doc: &Document) -> Vec<String> {
        details::extract_contributors(doc)
    }

    /// Page identifier; `source_url` and the clock back the last fallbacks.
    pub fn id(&self, doc: &Document, source_url: &str) -> String {
        details::extract_id(doc, source_url, &self.site.id_prefix, self.clock.as_ref())
    }
}
