use crate::error::{FetchError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Proxy};
use std::time::Duration;
use vitrine_core::HttpConfig;

/// Source of raw HTML for a URL.
///
/// Implementations must report network and protocol failures as errors
/// rather than returning an error page as HTML.
#[async_trait::async_trait]
pub trait HtmlFetcher: Send + Sync {
    /// Fetch the page body at `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed fetcher. One instance owns one connection pool and is
/// meant to be shared across extractions.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher from transport settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);

        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(Self::headers(config)?);

        if let Some(proxy_config) = &config.proxy {
            let mut proxy = Proxy::all(proxy_config.url())
                .map_err(|e| FetchError::Client(format!("invalid proxy: {e}")))?;
            if let Some(auth) = &proxy_config.auth {
                proxy = proxy.basic_auth(&auth.username, &auth.password);
            }
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn headers(config: &HttpConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::Client(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::Client(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: error_chain(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: error_chain(&e),
        })?;

        tracing::debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

/// Flatten an error and its sources into one message.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{ProxyAuth, ProxyConfig};

    #[test]
    fn test_fetcher_creation() {
        assert!(HttpFetcher::new(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_fetcher_with_proxy() {
        let config = HttpConfig {
            proxy: Some(ProxyConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                auth: Some(ProxyAuth {
                    username: "user".to_string(),
                    password: "pass".to_string(),
                }),
            }),
            ..HttpConfig::default()
        };
        assert!(HttpFetcher::new(&config).is_ok());
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let mut config = HttpConfig::default();
        config
            .headers
            .insert("Bad Header".to_string(), "value".to_string());
        let err = HttpFetcher::new(&config).expect_err("header with space must fail");
        assert!(matches!(err, FetchError::Client(_)));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let wrapped = std::io::Error::new(std::io::ErrorKind::Other, io);
        assert!(error_chain(&wrapped).contains("connection reset"));
    }
}
