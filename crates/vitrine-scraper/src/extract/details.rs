//! Fields read from the specification table: format, contributors and
//! product identifier.

use super::availability::contains_any;
use crate::clock::Clock;
use crate::document::{Document, Element};
use crate::probe::{first_some, first_text, Probe};
use crate::selectors::details;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;
use vitrine_core::FORMAT_UNSPECIFIED;

/// Contributor tokens this long are prose, not names.
const MAX_CONTRIBUTOR_CHARS: usize = 100;

/// One label/value row of the specification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

/// Rows of the first table layout present on the page.
pub fn detail_rows(doc: &Document) -> Vec<DetailRow> {
    details::ROWS
        .iter()
        .map(|selector| doc.find_all(selector))
        .find(|rows| !rows.is_empty())
        .map(|rows| rows.iter().filter_map(to_detail_row).collect())
        .unwrap_or_default()
}

fn to_detail_row(row: &Element<'_>) -> Option<DetailRow> {
    let cells = row.find_all("td");
    let (label, value) = match row.find_first("th") {
        Some(th) => (th.text(), cells.first()?.text()),
        None => (cells.first()?.text(), cells.get(1)?.text()),
    };
    (!label.is_empty()).then_some(DetailRow { label, value })
}

/// Value of the first row whose label contains one of `keywords`.
fn row_value(rows: &[DetailRow], keywords: &[&str]) -> Option<String> {
    rows.iter()
        .find(|row| contains_any(&row.label, keywords) && !row.value.is_empty())
        .map(|row| row.value.clone())
}

pub fn extract_format(doc: &Document) -> String {
    first_text(doc, details::FORMAT_CELL)
        .or_else(|| row_value(&detail_rows(doc), details::FORMAT_LABELS))
        .unwrap_or_else(|| FORMAT_UNSPECIFIED.to_string())
}

pub fn extract_contributors(doc: &Document) -> Vec<String> {
    first_text(doc, details::AUTHORS_CELL)
        .or_else(|| row_value(&detail_rows(doc), details::AUTHOR_LABELS))
        .map(|raw| split_contributors(&raw))
        .unwrap_or_default()
}

/// Split a comma-separated credit line, dropping blanks, overlong tokens and
/// repeats while keeping first-seen order.
pub fn split_contributors(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty() && name.chars().count() < MAX_CONTRIBUTOR_CHARS)
        .filter(|name| seen.insert(name.to_string()))
        .map(ToString::to_string)
        .collect()
}

/// Identifier from the page, else from the URL, else synthesized from the clock.
pub fn extract_id(doc: &Document, source_url: &str, id_prefix: &str, clock: &dyn Clock) -> String {
    let probes: [Probe<'_, String>; 4] = [
        &|doc| first_text(doc, details::REFERENCE_CELL),
        &generic_id_holder,
        &|doc| row_value(&detail_rows(doc), details::REFERENCE_LABELS),
        &reference_in_text,
    ];

    if let Some(id) = first_some(doc, &probes) {
        return id;
    }

    if let Some(slug) = url_slug(source_url) {
        debug!("Using URL slug as id: {}", slug);
        return slug;
    }

    let id = format!("{}-{}", id_prefix, clock.now_millis());
    debug!("Synthesized id {}", id);
    id
}

fn generic_id_holder(doc: &Document) -> Option<String> {
    details::ID_HOLDERS.iter().find_map(|selector| {
        doc.find_all(selector).into_iter().find_map(|holder| {
            let text = holder.text();
            if !text.is_empty() {
                return Some(text);
            }
            details::ID_ATTRIBUTES
                .iter()
                .filter_map(|attr| holder.attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty())
                .map(ToString::to_string)
        })
    })
}

fn reference_in_text(doc: &Document) -> Option<String> {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    let reference = REFERENCE.get_or_init(|| {
        Regex::new(r"(?i)refer[êe]ncia\s*:\s*([a-z0-9][a-z0-9._-]*)").expect("valid regex")
    });

    reference
        .captures(&doc.text())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Last path segment of `url` without query, fragment or extension.
pub fn url_slug(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest)
        .split_once('/')
        .map(|(_, path)| path)?;

    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let stem = segment
        .rsplit_once('.')
        .map_or(segment, |(stem, _extension)| stem);

    (!stem.is_empty()).then(|| stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    const SPECS: &str = r#"
        <table id="product-attribute-specs-table">
          <tr><th>Referência</th><td data-th="Referência">AVEN0042</td></tr>
          <tr><th>Encadernação</th><td data-th="Encadernação">Capa cartão</td></tr>
          <tr><th>Autores</th><td data-th="Autores">Stan Lee, Jack Kirby, Stan Lee, </td></tr>
        </table>
    "#;

    #[test]
    fn test_detail_rows() {
        let doc = Document::parse(SPECS);
        let rows = detail_rows(&doc);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].label, "Encadernação");
        assert_eq!(rows[1].value, "Capa cartão");
    }

    #[test]
    fn test_format_from_attribute_cell() {
        assert_eq!(extract_format(&Document::parse(SPECS)), "Capa cartão");
    }

    #[test]
    fn test_format_from_row_label() {
        let doc = Document::parse(
            r#"<table class="data"><tr><td>Formato</td><td>17 x 26 cm</td></tr></table>"#,
        );
        assert_eq!(extract_format(&doc), "17 x 26 cm");
    }

    #[test]
    fn test_format_unspecified() {
        assert_eq!(extract_format(&Document::parse("<p>nada</p>")), FORMAT_UNSPECIFIED);
    }

    #[test]
    fn test_contributors_are_deduplicated_in_order() {
        assert_eq!(
            extract_contributors(&Document::parse(SPECS)),
            vec!["Stan Lee", "Jack Kirby"]
        );
        assert_eq!(split_contributors("A, A, B"), vec!["A", "B"]);
    }

    #[test]
    fn test_contributors_drop_overlong_tokens() {
        let long = "x".repeat(100);
        assert_eq!(split_contributors(&format!("Moore, {long}, Gibbons")), vec!["Moore", "Gibbons"]);
        let almost = "y".repeat(99);
        assert_eq!(split_contributors(&almost), vec![almost.clone()]);
    }

    #[test]
    fn test_contributors_from_script_and_art_rows() {
        let doc = Document::parse(
            r#"<table class="data">
                 <tr><th>Editora</th><td>Panini</td></tr>
                 <tr><th>Roteiro</th><td>Mark Waid</td></tr>
                 <tr><th>Arte</th><td>Alex Ross</td></tr>
               </table>"#,
        );
        assert_eq!(extract_contributors(&doc), vec!["Mark Waid"]);
    }

    #[test]
    fn test_no_contributors() {
        assert!(extract_contributors(&Document::parse("<p>nada</p>")).is_empty());
    }

    #[test]
    fn test_id_from_reference_cell() {
        let id = extract_id(&Document::parse(SPECS), "https://panini.com.br/x", "panini", &FixedClock(1));
        assert_eq!(id, "AVEN0042");
    }

    #[test]
    fn test_id_from_generic_holder_attribute() {
        let doc = Document::parse(r#"<meta itemprop="sku" content="MSPI001">"#);
        assert_eq!(extract_id(&doc, "https://panini.com.br/x", "panini", &FixedClock(1)), "MSPI001");
    }

    #[test]
    fn test_id_from_row_label() {
        let doc = Document::parse(
            r#"<table class="data"><tr><th>Código de barras</th><td>7891234567890</td></tr></table>"#,
        );
        assert_eq!(extract_id(&doc, "https://panini.com.br/x", "panini", &FixedClock(1)), "7891234567890");
    }

    #[test]
    fn test_id_from_page_text() {
        let doc = Document::parse("<p>Referência: MPLA-77 disponível</p>");
        assert_eq!(extract_id(&doc, "https://panini.com.br/x", "panini", &FixedClock(1)), "MPLA-77");
    }

    #[test]
    fn test_id_from_url_slug() {
        let doc = Document::parse("<p>nada</p>");
        let id = extract_id(
            &doc,
            "https://panini.com.br/one-piece-vol-1.html?utm_source=x",
            "panini",
            &FixedClock(1),
        );
        assert_eq!(id, "one-piece-vol-1");
    }

    #[test]
    fn test_id_synthesized_from_clock() {
        let doc = Document::parse("<p>nada</p>");
        let id = extract_id(&doc, "https://panini.com.br/", "panini", &FixedClock(1_700_000_000_123));
        assert_eq!(id, "panini-1700000000123");
    }

    #[test]
    fn test_url_slug() {
        assert_eq!(url_slug("https://panini.com.br/a/b/berserk-01/").as_deref(), Some("berserk-01"));
        assert_eq!(url_slug("https://panini.com.br/berserk.html#top").as_deref(), Some("berserk"));
        assert_eq!(url_slug("https://panini.com.br"), None);
        assert_eq!(url_slug("https://panini.com.br/"), None);
    }
}
