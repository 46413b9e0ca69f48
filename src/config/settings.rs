//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the crawler.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration settings for the crawler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Network/transport configuration
    pub network: NetworkSettings,
    /// Crawl pacing configuration
    pub crawl: CrawlSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Network and transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// HTTPS proxy URL
    pub https_proxy: Option<String>,
    /// HTTP proxy URL
    pub http_proxy: Option<String>,
    /// Catch-all proxy URL
    pub all_proxy: Option<String>,
    /// Verify upstream TLS certificates. Off by default: the crawler is
    /// routinely run behind intercepting proxies whose certificates never
    /// validate.
    pub verify_tls: bool,
}

/// Crawl pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Sleep between result pages, in seconds
    pub interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            https_proxy: None,
            http_proxy: None,
            all_proxy: None,
            verify_tls: false,
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self { interval_secs: 2 }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: NetworkSettings::default(),
            crawl: CrawlSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }

    /// Inter-page sleep as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.crawl.interval_secs)
    }

    /// Effective proxy URL, HTTPS proxy winning over HTTP over catch-all
    pub fn get_proxy_url(&self) -> Option<&str> {
        self.network
            .https_proxy
            .as_deref()
            .or(self.network.http_proxy.as_deref())
            .or(self.network.all_proxy.as_deref())
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| crate::Error::Config(format!("Invalid config file {:?}: {}", path, e)))
    }

    /// Load settings from environment variables on top of defaults
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Overlay environment variables onto these settings
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(timeout) = std::env::var("MAGPIE_TIMEOUT") {
            self.network.timeout_secs = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid timeout: {}", e)))?;
        }

        if let Ok(interval) = std::env::var("MAGPIE_INTERVAL") {
            self.crawl.interval_secs = interval
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid interval: {}", e)))?;
        }

        if let Ok(proxy) = std::env::var("HTTPS_PROXY") {
            self.network.https_proxy = Some(proxy);
        }
        if let Ok(proxy) = std::env::var("HTTP_PROXY") {
            self.network.http_proxy = Some(proxy);
        }
        if let Ok(proxy) = std::env::var("ALL_PROXY") {
            self.network.all_proxy = Some(proxy);
        }

        Ok(self)
    }

    /// Validate the final configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.network.timeout_secs == 0 {
            return Err(crate::Error::config("timeout must be greater than zero"));
        }

        if let Some(proxy) = self.get_proxy_url() {
            url::Url::parse(proxy)
                .map_err(|e| crate::Error::Config(format!("Invalid proxy URL {}: {}", proxy, e)))?;
        }

        Ok(())
    }
}
