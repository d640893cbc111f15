use serde::Serialize;
use std::fmt;
use thiserror::Error;
use vitrine_core::VitrineError;

/// Classified failure of a single-URL extraction. Every variant carries the URL.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid product URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no product found at {url}: missing {field}")]
    ProductNotFound { url: String, field: Field },

    #[error("scraping {url} failed: {message}")]
    ScrapingFailed {
        url: String,
        message: String,
        status: Option<u16>,
    },
}

impl ScrapeError {
    pub fn scraping_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScrapingFailed {
            url: url.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::ProductNotFound { url, .. }
            | Self::ScrapingFailed { url, .. } => url,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::ProductNotFound { .. } => ErrorKind::ProductNotFound,
            Self::ScrapingFailed { .. } => ErrorKind::ScrapingFailed,
        }
    }

    /// Transport status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ScrapingFailed { status, .. } => *status,
            _ => None,
        }
    }
}

/// Discriminant of [`ScrapeError`], as reported in batch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InvalidUrl,
    ProductNotFound,
    ScrapingFailed,
}

/// Required fields whose absence means "not a product page".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Price,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Price => write!(f, "price"),
        }
    }
}

/// Failure while assembling a record from a parsed page.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0} not found")]
    NotFound(Field),

    #[error("invalid product record: {0}")]
    InvalidRecord(#[from] VitrineError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
