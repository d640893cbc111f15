//! Brazilian-formatted price parsing and price location.

use crate::document::{Document, Element};
use crate::probe::{first_match, first_match_in};
use crate::selectors::{availability, price};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Full and current price of a product page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prices {
    pub full: f64,
    pub current: f64,
}

/// Parse the first number in `text` written as `1.234,56`.
///
/// `.` separates thousands and `,` decimals. Returns `0.0` when no number is
/// present; callers treat zero as "not found".
pub fn parse_price(text: &str) -> f64 {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let number = NUMBER.get_or_init(|| Regex::new(r"\d+(?:\.\d{3})*(?:,\d+)?").expect("valid regex"));

    number
        .find(text)
        .and_then(|m| m.as_str().replace('.', "").replace(',', ".").parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Locate the prices, or `None` when no non-zero current price exists.
///
/// Both prices come from the main product block when it carries a price,
/// otherwise from the whole page. Without a distinct list price the product
/// is taken as not discounted and `full` equals `current`.
pub fn extract_prices(doc: &Document) -> Option<Prices> {
    let area = availability::PRODUCT_AREA
        .iter()
        .find_map(|selector| doc.find_first(selector));

    if let Some(area) = area {
        let scoped = prices_from(|selectors| first_match_in(&area, selectors, non_zero_price));
        if scoped.is_some() {
            return scoped;
        }
        debug!("No price inside the product area, searching the whole page");
    }

    prices_from(|selectors| first_match(doc, selectors, non_zero_price))
}

/// Current price first; the list price is only read from the same scope.
fn prices_from(lookup: impl Fn(&[&str]) -> Option<f64>) -> Option<Prices> {
    let current = lookup(price::CURRENT).or_else(|| lookup(price::GENERIC))?;
    let full = lookup(price::ORIGINAL).unwrap_or(current);

    debug!("Extracted prices: full={} current={}", full, current);
    Some(Prices { full, current })
}

fn non_zero_price(element: Element<'_>) -> Option<f64> {
    let value = parse_price(&element.text());
    (value > 0.0).then_some(value)
}
