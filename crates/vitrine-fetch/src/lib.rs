//! HTTP transport for Vitrine.
//!
//! The scraper only depends on the [`HtmlFetcher`] trait; [`HttpFetcher`] is
//! the `reqwest`-backed implementation configured from [`vitrine_core::HttpConfig`].

pub mod error;
pub mod fetcher;

pub use error::{FetchError, Result};
pub use fetcher::{HtmlFetcher, HttpFetcher};
