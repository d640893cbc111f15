//! Ordered fallback lookups.
//!
//! A probe inspects the document and either finds a value or yields `None`.
//! Extractors list their probes in priority order and take the first hit;
//! `None` means "try the next location", never "the extraction failed".

use crate::document::{Document, Element};

/// A single candidate location for a field.
pub type Probe<'p, T> = &'p dyn Fn(&Document) -> Option<T>;

/// Run `probes` in order and return the first value found.
pub fn first_some<T>(doc: &Document, probes: &[Probe<'_, T>]) -> Option<T> {
    probes.iter().find_map(|probe| probe(doc))
}

/// Walk `selectors` in order and, within each, matching elements in
/// document order; return the first element `accept` maps to a value.
pub fn first_match<'d, T>(
    doc: &'d Document,
    selectors: &[&str],
    mut accept: impl FnMut(Element<'d>) -> Option<T>,
) -> Option<T> {
    selectors
        .iter()
        .find_map(|selector| doc.find_all(selector).into_iter().find_map(&mut accept))
}

/// [`first_match`] restricted to the descendants of `scope`.
pub fn first_match_in<'d, T>(
    scope: &Element<'d>,
    selectors: &[&str],
    mut accept: impl FnMut(Element<'d>) -> Option<T>,
) -> Option<T> {
    selectors
        .iter()
        .find_map(|selector| scope.find_all(selector).into_iter().find_map(&mut accept))
}

/// First non-empty element text under `selectors`.
pub fn first_text(doc: &Document, selectors: &[&str]) -> Option<String> {
    first_match(doc, selectors, |element| {
        let text = element.text();
        (!text.is_empty()).then_some(text)
    })
}
