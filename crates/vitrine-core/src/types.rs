//! The product record produced by a successful extraction.
//!
//! A [`ProductRecord`] can only be obtained through [`ProductRecord::new`],
//! which re-checks every invariant of the record. Extractors are expected to
//! satisfy them already; a violation here means an extractor regressed.

use crate::error::{Result, VitrineError};
use serde::Serialize;
use std::collections::HashSet;

/// Format value used when the page does not state one.
pub const FORMAT_UNSPECIFIED: &str = "Não especificado";

/// Unvalidated field values collected by the extractors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    /// Product title
    pub title: String,
    /// List price before any discount
    pub full_price: f64,
    /// Price currently charged
    pub current_price: f64,
    /// Whether the product can be bought now
    pub in_stock: bool,
    /// Whether the product is sold as a pre-order
    pub is_pre_order: bool,
    /// Absolute image URL, or empty when the page has none
    pub image_url: String,
    /// Page the record was extracted from
    pub source_url: String,
    /// Binding or format description
    pub format: String,
    /// Authors and artists, deduplicated
    pub contributors: Vec<String>,
    /// Site reference or synthesized identifier
    pub id: String,
}

/// Immutable, validated product record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    title: String,
    full_price: f64,
    current_price: f64,
    in_stock: bool,
    is_pre_order: bool,
    image_url: String,
    source_url: String,
    format: String,
    contributors: Vec<String>,
    id: String,
}

impl ProductRecord {
    /// Validate a draft and freeze it into a record.
    ///
    /// # Errors
    /// Returns [`VitrineError::Validation`] naming the first broken invariant.
    pub fn new(draft: ProductDraft) -> Result<Self> {
        Self::validate(&draft)?;

        let ProductDraft {
            title,
            full_price,
            current_price,
            in_stock,
            is_pre_order,
            image_url,
            source_url,
            format,
            contributors,
            id,
        } = draft;

        Ok(Self {
            title,
            full_price,
            current_price,
            in_stock,
            is_pre_order,
            image_url,
            source_url,
            format,
            contributors,
            id,
        })
    }

    fn validate(draft: &ProductDraft) -> Result<()> {
        if draft.title.trim().is_empty() {
            return Err(invalid("title must not be empty"));
        }

        for (name, price) in [
            ("full price", draft.full_price),
            ("current price", draft.current_price),
        ] {
            if !price.is_finite() || price < 0.0 {
                return Err(invalid(format!(
                    "{name} must be a non-negative number, got {price}"
                )));
            }
        }

        if draft.current_price > draft.full_price {
            return Err(invalid(format!(
                "current price {} exceeds full price {}",
                draft.current_price, draft.full_price
            )));
        }

        if !draft.image_url.is_empty() && !is_absolute_http_url(&draft.image_url) {
            return Err(invalid(format!(
                "image URL must be absolute or empty, got '{}'",
                draft.image_url
            )));
        }

        if !is_absolute_http_url(&draft.source_url) {
            return Err(invalid(format!(
                "source URL must be an absolute http(s) URL, got '{}'",
                draft.source_url
            )));
        }

        let mut seen = HashSet::new();
        for contributor in &draft.contributors {
            if contributor.trim().is_empty() {
                return Err(invalid("contributor names must not be empty"));
            }
            if !seen.insert(contributor.as_str()) {
                return Err(invalid(format!("duplicate contributor '{contributor}'")));
            }
        }

        if draft.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }

        Ok(())
    }

    /// Product title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// List price before any discount.
    #[must_use]
    pub fn full_price(&self) -> f64 {
        self.full_price
    }

    /// Price currently charged.
    #[must_use]
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Whether the product can be bought now.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    /// Whether the product is sold as a pre-order.
    #[must_use]
    pub fn is_pre_order(&self) -> bool {
        self.is_pre_order
    }

    /// Absolute image URL, empty when absent.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Page the record was extracted from.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Binding or format description, or [`FORMAT_UNSPECIFIED`].
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Authors and artists.
    #[must_use]
    pub fn contributors(&self) -> &[String] {
        &self.contributors
    }

    /// Site reference or synthesized identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

fn invalid(reason: impl Into<String>) -> VitrineError {
    VitrineError::Validation(reason.into())
}

fn is_absolute_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            title: "Sandman Vol. 1".to_string(),
            full_price: 89.9,
            current_price: 71.92,
            in_stock: true,
            is_pre_order: false,
            image_url: "https://panini.com.br/media/catalog/product/s/a/sandman.jpg".to_string(),
            source_url: "https://panini.com.br/sandman-vol-1".to_string(),
            format: "Capa dura".to_string(),
            contributors: vec!["Neil Gaiman".to_string(), "Sam Kieth".to_string()],
            id: "ASAND001".to_string(),
        }
    }

    #[test]
    fn test_valid_record() {
        let record = ProductRecord::new(draft()).expect("valid draft");
        assert_eq!(record.title(), "Sandman Vol. 1");
        assert!((record.current_price() - 71.92).abs() < f64::EPSILON);
        assert_eq!(record.contributors().len(), 2);
        assert_eq!(record.id(), "ASAND001");
    }

    #[test]
    fn test_current_price_above_full_price_is_rejected() {
        let mut d = draft();
        d.current_price = 99.0;
        let err = ProductRecord::new(d).expect_err("price inversion must fail");
        assert!(err.to_string().contains("exceeds full price"));
    }

    #[test]
    fn test_equal_prices_are_accepted() {
        let mut d = draft();
        d.current_price = d.full_price;
        assert!(ProductRecord::new(d).is_ok());
    }

    #[test]
    fn test_negative_or_nan_price_is_rejected() {
        let mut d = draft();
        d.full_price = -1.0;
        assert!(ProductRecord::new(d).is_err());

        let mut d = draft();
        d.current_price = f64::NAN;
        assert!(ProductRecord::new(d).is_err());
    }

    #[test]
    fn test_empty_title_and_id_are_rejected() {
        let mut d = draft();
        d.title = "   ".to_string();
        assert!(ProductRecord::new(d).is_err());

        let mut d = draft();
        d.id = String::new();
        assert!(ProductRecord::new(d).is_err());
    }

    #[test]
    fn test_empty_image_url_is_valid() {
        let mut d = draft();
        d.image_url = String::new();
        assert!(ProductRecord::new(d).is_ok());
    }

    #[test]
    fn test_relative_urls_are_rejected() {
        let mut d = draft();
        d.image_url = "/media/catalog/product/x.jpg".to_string();
        assert!(ProductRecord::new(d).is_err());

        let mut d = draft();
        d.source_url = "panini.com.br/sandman".to_string();
        assert!(ProductRecord::new(d).is_err());
    }

    #[test]
    fn test_duplicate_contributors_are_rejected() {
        let mut d = draft();
        d.contributors = vec!["Neil Gaiman".to_string(), "Neil Gaiman".to_string()];
        assert!(ProductRecord::new(d).is_err());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = ProductRecord::new(draft()).expect("valid draft");
        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["fullPrice"], 89.9);
        assert_eq!(json["isPreOrder"], false);
        assert_eq!(json["sourceUrl"], "https://panini.com.br/sandman-vol-1");
    }
}
