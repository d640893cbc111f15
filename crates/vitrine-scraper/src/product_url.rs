use crate::error::{Result, ScrapeError};
use regex::Regex;

/// Accepts only URLs on the configured store domain.
#[derive(Debug, Clone)]
pub struct ProductUrlRule {
    domain: String,
    pattern: Regex,
}

impl ProductUrlRule {
    pub fn new(domain: &str) -> Self {
        let domain = domain.trim().trim_start_matches("www.").to_lowercase();
        // the host must end right after the domain, so "panini.com.br.evil.io" is rejected
        let pattern = Regex::new(&format!(
            r"(?i)^https?://(?:www\.)?{}(?:[/:?#]|$)",
            regex::escape(&domain)
        ))
        .expect("valid regex");

        Self { domain, pattern }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Check that `url` points at the store. No network I/O happens here.
    ///
    /// Stricter than a prefix match: scheme and host compare
    /// case-insensitively, and the host must end right after the domain, so
    /// `https://panini.com.br.evil.io` is rejected while
    /// `https://panini.com.br:443/x` is accepted.
    pub fn validate(&self, url: &str) -> Result<()> {
        let candidate = url.trim();
        if candidate.is_empty() {
            return Err(ScrapeError::InvalidUrl {
                url: url.to_string(),
                reason: "URL is empty".to_string(),
            });
        }

        if !self.pattern.is_match(candidate) {
            return Err(ScrapeError::InvalidUrl {
                url: url.to_string(),
                reason: format!("expected an http(s) URL on {}", self.domain),
            });
        }

        Ok(())
    }
}

/// Trim whitespace and trailing slashes, defaulting the scheme to https.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn rule() -> ProductUrlRule {
        ProductUrlRule::new("panini.com.br")
    }

    #[test]
    fn test_accepts_store_urls() {
        for url in [
            "https://panini.com.br/berserk-vol-1",
            "http://panini.com.br/berserk-vol-1",
            "https://www.panini.com.br/berserk-vol-1?x=1",
            "HTTPS://WWW.PANINI.COM.BR/",
            "https://panini.com.br",
            "https://panini.com.br:443/x",
        ] {
            assert!(rule().validate(url).is_ok(), "{url}");
        }
    }

    #[test]
    fn test_rejects_other_urls() {
        for url in [
            "not-a-url",
            "ftp://panini.com.br/x",
            "https://panini.com.br.evil.io/x",
            "https://lojapanini.com.br/x",
            "https://amazon.com.br/dp/123",
            "panini.com.br/x",
        ] {
            let err = rule().validate(url).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidUrl, "{url}");
            assert_eq!(err.url(), url);
        }
    }

    #[test]
    fn test_rejects_empty() {
        let err = rule().validate("   ").unwrap_err();
        assert!(err.to_string().contains("URL is empty"));
    }

    #[test]
    fn test_configured_domain_is_normalized() {
        let rule = ProductUrlRule::new(" www.Panini.com.br ");
        assert_eq!(rule.domain(), "panini.com.br");
        assert!(rule.validate("https://panini.com.br/x").is_ok());
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("https://panini.com.br/x/"), "https://panini.com.br/x");
        assert_eq!(normalize_url("  https://panini.com.br/x  "), "https://panini.com.br/x");
        assert_eq!(normalize_url("panini.com.br/x"), "https://panini.com.br/x");
    }
}
