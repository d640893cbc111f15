//! Turns a parsed page into a validated [`ProductRecord`].

use crate::document::Document;
use crate::error::{ExtractError, Field};
use crate::extract::FieldExtractors;
use tracing::debug;
use vitrine_core::{ProductDraft, ProductRecord};

/// Run every field extractor in a fixed order and validate the result.
///
/// Title and price are required; their absence is reported as
/// [`ExtractError::NotFound`]. A draft that breaks a record invariant is
/// reported as [`ExtractError::InvalidRecord`].
pub fn assemble(
    fields: &FieldExtractors,
    doc: &Document,
    source_url: &str,
) -> Result<ProductRecord, ExtractError> {
    let title = fields.title(doc).ok_or(ExtractError::NotFound(Field::Title))?;
    let prices = fields.prices(doc).ok_or(ExtractError::NotFound(Field::Price))?;
    let is_pre_order = fields.is_pre_order(doc);
    let in_stock = fields.in_stock(doc);
    let image_url = fields.image_url(doc);
    let format = fields.format(doc);
    let contributors = fields.contributors(doc);
    let id = fields.id(doc, source_url);

    debug!(
        "Assembled '{}' (id={}, pre_order={}, in_stock={})",
        title, id, is_pre_order, in_stock
    );

    let record = ProductRecord::new(ProductDraft {
        title,
        full_price: prices.full,
        current_price: prices.current,
        in_stock,
        is_pre_order,
        image_url,
        source_url: source_url.to_string(),
        format,
        contributors,
        id,
    })?;

    Ok(record)
}
