//! Configuration management for Vitrine.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/vitrine/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Target site settings
    pub site: SiteConfig,
    /// HTTP transport settings
    pub http: HttpConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `VITRINE_TIMEOUT_MS`: Override the HTTP timeout
    /// - `VITRINE_USER_AGENT`: Override the HTTP user agent
    /// - `VITRINE_SITE_DOMAIN`: Override the accepted site domain
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides using the given variable lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("VITRINE_TIMEOUT_MS") {
            if let Ok(timeout_ms) = val.parse() {
                self.http.timeout_ms = timeout_ms;
                tracing::debug!("Override http.timeout_ms from env: {}", timeout_ms);
            }
        }

        if let Some(user_agent) = lookup("VITRINE_USER_AGENT") {
            tracing::debug!("Override http.user_agent from env: {}", user_agent);
            self.http.user_agent = user_agent;
        }

        if let Some(domain) = lookup("VITRINE_SITE_DOMAIN") {
            tracing::debug!("Override site.domain from env: {}", domain);
            self.site.domain = domain;
        }
    }

    /// Check values that serde cannot constrain.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.site.domain.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "site.domain".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        match url::Url::parse(&self.site.base_url) {
            Ok(base) if matches!(base.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "site.base_url".to_string(),
                    reason: format!("must be an absolute http(s) URL, got '{}'", self.site.base_url),
                })
            }
        }

        if self.http.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> ConfigResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/vitrine/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("br", "vitrine", "vitrine").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// The single retail site the extractors are tuned for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Domain accepted by URL validation (without `www.`)
    pub domain: String,
    /// Origin used to resolve root-relative paths
    pub base_url: String,
    /// Prefix of synthesized product identifiers
    pub id_prefix: String,
    /// Substrings that mark a URL as served from the product image CDN
    pub cdn_markers: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: "panini.com.br".to_string(),
            base_url: "https://panini.com.br".to_string(),
            id_prefix: "panini".to_string(),
            cdn_markers: vec![
                "/media/catalog/product".to_string(),
                "cloudfront.net".to_string(),
            ],
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect and read timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string
    pub user_agent: String,
    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Optional forward proxy
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        );
        headers.insert("Accept-Language".to_string(), "pt-BR,pt;q=0.9".to_string());

        Self {
            timeout_ms: 30_000,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            headers,
            proxy: None,
        }
    }
}

/// Forward proxy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy host name or address
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// Optional basic authentication
    pub auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    /// Proxy URL in the form `http://host:port`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Basic authentication for a proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyAuth {
    /// User name
    pub username: String,
    /// Password
    pub password: String,
}
