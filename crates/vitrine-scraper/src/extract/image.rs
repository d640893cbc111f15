//! Product image location.
//!
//! The locator walks five stages from most to least specific and stops at
//! the first acceptable URL. Within every stage placeholder images are
//! skipped, so a later real picture always beats an earlier spinner. An
//! empty string means the page has no usable image.

use super::availability::contains_any;
use crate::document::{Document, Element};
use crate::probe::{first_match, first_some, Probe};
use crate::selectors::image;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace};
use url::Url;
use vitrine_core::SiteConfig;

/// Elements that reference scripts or frames rather than pictures.
const NON_IMAGE_CARRIERS: &[&str] = &["script", "iframe", "link"];

/// Finds the product picture of a page.
#[derive(Debug, Clone)]
pub struct ImageLocator {
    base: Option<Url>,
    cdn_markers: Vec<String>,
    script_keys: Regex,
}

impl ImageLocator {
    pub fn new(site: &SiteConfig) -> Self {
        let base = Url::parse(&site.base_url).ok();
        if base.is_none() {
            debug!("Base URL '{}' is not absolute, relative images will be skipped", site.base_url);
        }

        let keys = image::SCRIPT_KEYS
            .iter()
            .map(|key| regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");
        let script_keys = Regex::new(&format!(r#""(?:{keys})"\s*:\s*"((?:[^"\\]|\\.)*)""#))
            .expect("valid regex");

        Self {
            base,
            cdn_markers: site.cdn_markers.iter().map(|m| m.to_lowercase()).collect(),
            script_keys,
        }
    }

    /// Best image URL on the page, or an empty string.
    pub fn locate(&self, doc: &Document) -> String {
        let stages: [Probe<'_, (&'static str, String)>; 5] = [
            &|doc| self.cdn_sources(doc).map(|url| ("cdn source", url)),
            &|doc| self.cdn_image_attributes(doc).map(|url| ("image attribute", url)),
            &|doc| self.script_references(doc).map(|url| ("inline script", url)),
            &|doc| self.structural(doc).map(|url| ("product gallery", url)),
            &|doc| self.any_image(doc).map(|url| ("any image", url)),
        ];

        match first_some(doc, &stages) {
            Some((stage, url)) => {
                debug!("Image found via {}: {}", stage, url);
                url
            }
            None => {
                debug!("No product image found");
                String::new()
            }
        }
    }

    /// Stage 1: eager or lazy source attributes pointing at the CDN.
    fn cdn_sources(&self, doc: &Document) -> Option<String> {
        doc.find_all(image::SOURCE_CARRIERS)
            .into_iter()
            .filter(|element| !NON_IMAGE_CARRIERS.contains(&element.name()))
            .find_map(|element| {
                image::SOURCE_ATTRIBUTES
                    .iter()
                    .filter_map(|attr| element.attr(attr))
                    .filter(|value| self.has_cdn_marker(value))
                    .find_map(|value| self.accept(value))
            })
    }

    /// Stage 2: any attribute of any `img` mentioning the CDN.
    fn cdn_image_attributes(&self, doc: &Document) -> Option<String> {
        doc.find_all("img").into_iter().find_map(|img| {
            img.attrs()
                .filter(|(_, value)| self.has_cdn_marker(value))
                .find_map(|(name, value)| {
                    if image::SRCSET_ATTRIBUTES.contains(&name) {
                        self.accept(first_srcset_candidate(value)?)
                    } else {
                        self.accept(value)
                    }
                })
        })
    }

    /// Stage 3: image references inside inline scripts.
    fn script_references(&self, doc: &Document) -> Option<String> {
        let bodies: Vec<String> = doc
            .find_all("script")
            .iter()
            .map(Element::raw_text)
            .filter(|body| !body.trim().is_empty())
            .collect();

        bodies
            .iter()
            .find_map(|body| self.keyed_script_value(body))
            .or_else(|| bodies.iter().find_map(|body| self.cdn_script_url(body)))
            .or_else(|| bodies.iter().find_map(|body| self.generic_script_url(body)))
    }

    /// `"image": "..."` style fragments. Undecodable string literals are skipped.
    fn keyed_script_value(&self, body: &str) -> Option<String> {
        self.script_keys.captures_iter(body).find_map(|caps| {
            let literal = caps.get(1)?.as_str();
            let value = match serde_json::from_str::<String>(&format!("\"{literal}\"")) {
                Ok(value) => value,
                Err(e) => {
                    trace!("Skipping undecodable script value: {}", e);
                    return None;
                }
            };
            let value = value.trim();
            let addressable = value.starts_with("http://")
                || value.starts_with("https://")
                || value.starts_with('/');
            if addressable {
                self.accept(value)
            } else {
                None
            }
        })
    }

    /// CDN pictures, absolute or root-relative.
    fn cdn_script_url(&self, body: &str) -> Option<String> {
        script_image_paths(body)
            .filter(|url| self.has_cdn_marker(url))
            .find_map(|url| self.accept(url))
    }

    /// Any https picture, except social network assets.
    fn generic_script_url(&self, body: &str) -> Option<String> {
        script_image_urls(body)
            .filter(|url| url.starts_with("https://"))
            .filter(|url| !url.to_lowercase().ends_with(".gif"))
            .filter(|url| !contains_any(url, image::SOCIAL_DOMAINS))
            .find_map(|url| self.accept(url))
    }

    /// Stage 4: known gallery and cover containers.
    fn structural(&self, doc: &Document) -> Option<String> {
        first_match(doc, image::STRUCTURAL, |img| {
            let url = self.accept(source_of(&img)?)?;
            (has_image_extension(&url) || self.has_cdn_marker(&url)).then_some(url)
        })
    }

    /// Stage 5: first image that is not site chrome.
    fn any_image(&self, doc: &Document) -> Option<String> {
        doc.find_all("img").into_iter().find_map(|img| {
            let source = source_of(&img)?;
            let class = img.attr("class").unwrap_or_default();
            if has_chrome_token(source) || has_chrome_token(class) {
                trace!("Skipping site chrome image {}", source);
                return None;
            }
            self.accept(source)
        })
    }

    /// Resolve a raw attribute or script value into an absolute,
    /// non-placeholder URL. The value is taken whole.
    fn accept(&self, raw: &str) -> Option<String> {
        let candidate = raw.trim();
        if candidate.is_empty() {
            return None;
        }
        if is_placeholder(candidate) {
            trace!("Skipping placeholder image {}", candidate);
            return None;
        }
        self.resolve(candidate)
    }

    fn resolve(&self, candidate: &str) -> Option<String> {
        if candidate.starts_with("http://") || candidate.starts_with("https://") {
            return Url::parse(candidate).ok().map(|_| candidate.to_string());
        }
        if let Some(rest) = candidate.strip_prefix("//") {
            return Url::parse(&format!("https://{rest}")).ok().map(String::from);
        }
        if candidate.starts_with('/') {
            return self.base.as_ref()?.join(candidate).ok().map(String::from);
        }
        None
    }

    fn has_cdn_marker(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.cdn_markers.iter().any(|marker| value.contains(marker.as_str()))
    }
}

/// Source attribute of an image, eager first.
fn source_of<'a>(img: &Element<'a>) -> Option<&'a str> {
    image::SOURCE_ATTRIBUTES
        .iter()
        .filter_map(|attr| img.attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// URL of the first entry of a `srcset` list.
fn first_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset.trim().split(", ").next()?.split_whitespace().next()
}

/// Whether a source or class names site chrome. Markers match whole words
/// (a plural `s` allowed), so `navalha-capa.jpg` is not navigation.
fn has_chrome_token(value: &str) -> bool {
    value
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| {
            image::CHROME_MARKERS
                .iter()
                .any(|marker| token == *marker || token.strip_suffix('s') == Some(*marker))
        })
}

pub fn is_placeholder(url: &str) -> bool {
    contains_any(url, image::PLACEHOLDER_MARKERS)
}

fn has_image_extension(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or_default().to_lowercase();
    image::EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Absolute image URLs written literally in a script body.
fn script_image_urls(body: &str) -> impl Iterator<Item = &str> {
    static IMAGE_URL: OnceLock<Regex> = OnceLock::new();
    let pattern = IMAGE_URL.get_or_init(|| {
        Regex::new(r#"(?i)https?://[^\s"'<>()\\]+\.(?:jpe?g|png|webp|gif)"#).expect("valid regex")
    });
    pattern.find_iter(body).map(|m| m.as_str())
}

/// Absolute or root-relative image paths written literally in a script body.
fn script_image_paths(body: &str) -> impl Iterator<Item = &str> {
    static IMAGE_PATH: OnceLock<Regex> = OnceLock::new();
    let pattern = IMAGE_PATH.get_or_init(|| {
        Regex::new(r#"(?i)(?:https?:)?/[^\s"'<>()\\]+\.(?:jpe?g|png|webp|gif)"#).expect("valid regex")
    });
    pattern.find_iter(body).map(|m| m.as_str())
}
