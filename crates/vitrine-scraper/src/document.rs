//! Queryable handle over a parsed HTML page.
//!
//! Extractors only see [`Document`] and [`Element`]; selector strings are
//! compiled on use and an invalid selector behaves like a selector that
//! matches nothing.

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

/// Elements whose text is never rendered.
const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// First element matching `selector`, in document order.
    pub fn find_first(&self, selector: &str) -> Option<Element<'_>> {
        let selector = compile(selector)?;
        self.html.select(&selector).next().map(Element::new)
    }

    /// All elements matching `selector`, in document order.
    pub fn find_all(&self, selector: &str) -> Vec<Element<'_>> {
        compile(selector)
            .map(|selector| self.html.select(&selector).map(Element::new).collect())
            .unwrap_or_default()
    }

    /// Whitespace-normalized text of the whole page, scripts included.
    pub fn text(&self) -> String {
        Element::new(self.html.root_element()).text()
    }

    /// Text a reader would see: scripts, styles and hidden elements are skipped.
    pub fn visible_text(&self) -> String {
        Element::new(self.html.root_element()).visible_text()
    }
}

/// An element of a [`Document`].
#[derive(Clone, Copy)]
pub struct Element<'a> {
    inner: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn new(inner: ElementRef<'a>) -> Self {
        Self { inner }
    }

    /// Tag name, lowercase.
    pub fn name(&self) -> &'a str {
        self.inner.value().name()
    }

    /// All descendant text, whitespace collapsed and trimmed.
    pub fn text(&self) -> String {
        collapse_whitespace(&self.inner.text().collect::<String>())
    }

    /// Descendant text exactly as written, for script bodies.
    pub fn raw_text(&self) -> String {
        self.inner.text().collect()
    }

    /// Descendant text excluding non-rendered and hidden subtrees.
    pub fn visible_text(&self) -> String {
        if self.is_hidden() {
            return String::new();
        }
        let mut raw = String::new();
        collect_visible(self.inner, &mut raw);
        collapse_whitespace(&raw)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.inner.value().attrs()
    }

    pub fn find_first(&self, selector: &str) -> Option<Element<'a>> {
        let selector = compile(selector)?;
        self.inner.select(&selector).next().map(Element::new)
    }

    pub fn find_all(&self, selector: &str) -> Vec<Element<'a>> {
        compile(selector)
            .map(|selector| self.inner.select(&selector).map(Element::new).collect())
            .unwrap_or_default()
    }

    /// Whether this element or an ancestor is hidden by an inline
    /// `display: none` or the `hidden` attribute.
    pub fn is_hidden(&self) -> bool {
        std::iter::once(self.inner)
            .chain(self.inner.ancestors().filter_map(ElementRef::wrap))
            .any(hides)
    }
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(compiled) => Some(compiled),
        Err(e) => {
            warn!("Invalid selector '{}': {}", selector, e);
            None
        }
    }
}

fn hides(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    value.attr("style").is_some_and(|style| {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        style.contains("display:none")
    })
}

fn collect_visible(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !NON_RENDERED.contains(&child.value().name()) && !hides(child) {
                        collect_visible(child, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head><title>Loja</title><style>.x { color: red }</style></head>
          <body>
            <h1 class="page-title">  Homem-Aranha
               Vol. 1 </h1>
            <div id="tag" style="DISPLAY: None">Pré-venda</div>
            <div hidden><span>escondido</span></div>
            <script>var estoque = "esgotado";</script>
            <ul><li class="a">um</li><li class="a">dois</li></ul>
          </body>
        </html>
    "#;

    #[test]
    fn test_find_first_and_text() {
        let doc = Document::parse(PAGE);
        let title = doc.find_first("h1.page-title").expect("title present");
        assert_eq!(title.text(), "Homem-Aranha Vol. 1");
        assert_eq!(title.name(), "h1");
    }

    #[test]
    fn test_find_all_keeps_document_order() {
        let doc = Document::parse(PAGE);
        let items: Vec<_> = doc.find_all("li.a").iter().map(Element::text).collect();
        assert_eq!(items, vec!["um", "dois"]);
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = Document::parse(PAGE);
        assert!(doc.find_first("li[[").is_none());
        assert!(doc.find_all("li[[").is_empty());
    }

    #[test]
    fn test_visible_text_skips_scripts_and_hidden_elements() {
        let doc = Document::parse(PAGE);
        let visible = doc.visible_text();
        assert!(visible.contains("Homem-Aranha"));
        assert!(!visible.contains("esgotado"));
        assert!(!visible.contains("Pré-venda"));
        assert!(!visible.contains("escondido"));
        assert!(!visible.contains("color: red"));

        assert!(doc.text().contains("esgotado"));
    }

    #[test]
    fn test_hidden_detection_includes_ancestors() {
        let doc = Document::parse(PAGE);
        assert!(doc.find_first("#tag").expect("tag").is_hidden());
        assert!(doc.find_first("div[hidden] span").expect("span").is_hidden());
        assert!(!doc.find_first("h1").expect("h1").is_hidden());
    }
}
