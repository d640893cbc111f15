//! Stock and pre-order flags.
//!
//! Both flags default to the "nothing special" reading: a page that does not
//! say it is sold out is in stock, and a page that does not say pre-sale is
//! not a pre-order.

use crate::document::Document;
use crate::probe::{first_some, Probe};
use crate::selectors::availability;
use tracing::debug;

pub fn extract_in_stock(doc: &Document) -> bool {
    let sold_out = contains_any(&doc.visible_text(), availability::OUT_OF_STOCK_PHRASES);
    if sold_out {
        debug!("Out-of-stock phrase found");
    }
    !sold_out
}

pub fn extract_is_pre_order(doc: &Document) -> bool {
    let probes: [Probe<'_, &'static str>; 3] = [
        &|doc| pre_sale_indicator(doc).then_some("pre-sale indicator"),
        &|doc| status_containers(doc).then_some("status container"),
        &|doc| product_area(doc).then_some("product area"),
    ];

    match first_some(doc, &probes) {
        Some(stage) => {
            debug!("Pre-order detected via {}", stage);
            true
        }
        None => false,
    }
}

/// Visible pre-sale badge. A hidden badge is inconclusive, not negative.
fn pre_sale_indicator(doc: &Document) -> bool {
    availability::PRE_SALE_INDICATOR.iter().any(|selector| {
        doc.find_all(selector)
            .iter()
            .any(|badge| !badge.is_hidden() && contains_any(&badge.text(), availability::PRE_ORDER_PHRASES))
    })
}

fn status_containers(doc: &Document) -> bool {
    availability::STATUS_CONTAINERS.iter().any(|selector| {
        doc.find_all(selector)
            .iter()
            .any(|container| contains_any(&container.visible_text(), availability::PRE_ORDER_PHRASES))
    })
}

/// Only the main product block is searched, so menu entries such as
/// "Pré-venda" in the header do not flag every product.
fn product_area(doc: &Document) -> bool {
    availability::PRODUCT_AREA
        .iter()
        .find_map(|selector| doc.find_first(selector))
        .is_some_and(|area| contains_any(&area.visible_text(), availability::PRE_ORDER_PHRASES))
}

pub(crate) fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let text = text.to_lowercase();
    phrases.iter().any(|phrase| text.contains(&phrase.to_lowercase()))
}
