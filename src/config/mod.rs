//! Configuration management for the mandi backend
//!
//! This module handles loading and validating configuration from
//! environment variables or an optional TOML file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::llm::LlmConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Web/image search upstream configuration
    pub search: SearchConfig,

    /// LLM upstream configuration
    pub llm: LlmConfig,

    /// Document and object store configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the API server
    pub bind_address: SocketAddr,

    /// Allow cross-origin requests from the dashboard frontend
    pub enable_cors: bool,

    /// Emit one tracing span per request
    pub enable_request_logging: bool,
}

/// Web search upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search API base URL
    pub base_url: String,

    /// Search API key
    pub api_key: String,

    /// Result language
    pub language: String,

    /// Result country
    pub country: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Document and object store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Document store base URL
    pub document_url: String,

    /// Object store base URL (image bytes land here)
    pub object_url: String,

    /// Bucket name for product images
    pub image_bucket: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bind_address = std::env::var("MANDI_BIND")
            .unwrap_or_else(|_| String::from("0.0.0.0:8000"))
            .parse::<SocketAddr>()
            .context("MANDI_BIND is not a valid socket address")?;

        let enable_cors = std::env::var("MANDI_ENABLE_CORS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);

        let enable_request_logging = std::env::var("MANDI_REQUEST_LOGGING")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);

        let search_base_url = std::env::var("MANDI_SEARCH_URL")
            .unwrap_or_else(|_| String::from("https://serpapi.com"));

        let search_api_key = std::env::var("SEARCH_API_KEY").unwrap_or_default();

        let search_language = std::env::var("MANDI_SEARCH_HL").unwrap_or_else(|_| String::from("en"));
        let search_country = std::env::var("MANDI_SEARCH_GL").unwrap_or_else(|_| String::from("in"));

        let search_timeout_secs = std::env::var("MANDI_SEARCH_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(20);

        let document_url = std::env::var("MANDI_STORE_URL")
            .unwrap_or_else(|_| String::from("http://localhost:8900"));

        let object_url = std::env::var("MANDI_OBJECT_STORE_URL")
            .unwrap_or_else(|_| String::from("http://localhost:8910"));

        let image_bucket =
            std::env::var("MANDI_IMAGE_BUCKET").unwrap_or_else(|_| String::from("product-images"));

        let store_timeout_secs = std::env::var("MANDI_STORE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(15);

        let log_level = std::env::var("MANDI_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));
        let log_format = std::env::var("MANDI_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            server: ServerConfig {
                bind_address,
                enable_cors,
                enable_request_logging,
            },
            search: SearchConfig {
                base_url: search_base_url,
                api_key: search_api_key,
                language: search_language,
                country: search_country,
                timeout_secs: search_timeout_secs,
            },
            llm: LlmConfig::from_env(),
            store: StoreConfig {
                document_url,
                object_url,
                image_bucket,
                timeout_secs: store_timeout_secs,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.base_url.is_empty() {
            anyhow::bail!("search base URL must not be empty");
        }
        if self.store.document_url.is_empty() {
            anyhow::bail!("document store URL must not be empty");
        }
        if self.store.image_bucket.is_empty() {
            anyhow::bail!("image bucket must not be empty");
        }
        if self.search.timeout_secs == 0 || self.store.timeout_secs == 0 {
            anyhow::bail!("timeouts must be greater than zero");
        }
        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => anyhow::bail!("unknown log format: {other}"),
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:8000".parse().expect("static address"),
                enable_cors: true,
                enable_request_logging: true,
            },
            search: SearchConfig {
                base_url: String::from("https://serpapi.com"),
                api_key: String::new(),
                language: String::from("en"),
                country: String::from("in"),
                timeout_secs: 20,
            },
            llm: LlmConfig::default(),
            store: StoreConfig {
                document_url: String::from("http://localhost:8900"),
                object_url: String::from("http://localhost:8910"),
                image_bucket: String::from("product-images"),
                timeout_secs: 15,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address.port(), 8000);
        assert!(config.server.enable_cors);
    }

    #[test]
    fn test_validate_rejects_empty_bucket() {
        let mut config = Config::default();
        config.store.image_bucket.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = String::from("xml");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.search.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
