use crate::document::Document;
use crate::probe::first_text;
use crate::selectors::title;

pub fn extract_title(doc: &Document) -> Option<String> {
    first_text(doc, title::CANDIDATES)
}
