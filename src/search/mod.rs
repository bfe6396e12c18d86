//! Web and image search client
//!
//! Thin wrapper over a hosted search API (SerpAPI-compatible wire format).
//! The trend pipeline feeds organic results into the LLM prompt; the
//! feature-image lookup consumes the image results.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::error::{ErrorCategory, ErrorClassify};

/// Number of results requested per query
const RESULTS_PER_QUERY: u32 = 10;

/// Errors from the search upstream
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the search endpoint
    #[error("Search request failed with status {0}")]
    BadStatus(u16),

    /// No API key configured
    #[error("Search API key is not configured")]
    MissingApiKey,

    /// HTTP client construction failed
    #[error("Failed to create HTTP client: {0}")]
    Init(String),
}

impl ErrorClassify for SearchError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::BadStatus(status) => *status == 429 || *status >= 500,
            Self::MissingApiKey => false,
            Self::Init(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingApiKey => ErrorCategory::Config,
            _ => ErrorCategory::Network,
        }
    }
}

/// One organic web search result
#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// One image search result
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResult {
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ImageResult {
    /// Usable URL for this result: the original when present, otherwise the
    /// thumbnail, and only when it is an http(s) URL
    pub fn url(&self) -> Option<&str> {
        self.original
            .as_deref()
            .or(self.thumbnail.as_deref())
            .filter(|u| u.starts_with("http"))
    }
}

#[derive(Debug, Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    images_results: Vec<ImageResult>,
}

/// Client for the hosted search API
pub struct SearchClient {
    client: Client,
    config: SearchConfig,
}

impl SearchClient {
    /// Create a new search client
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(|e| SearchError::Init(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Run an organic web search
    pub async fn organic(&self, query: &str) -> Result<Vec<OrganicResult>, SearchError> {
        let response = self.run("google", query).await?;
        Ok(response.organic_results)
    }

    /// Run an image search
    pub async fn images(&self, query: &str) -> Result<Vec<ImageResult>, SearchError> {
        let response = self.run("google_images", query).await?;
        Ok(response.images_results)
    }

    async fn run(&self, engine: &str, query: &str) -> Result<SearchResponse, SearchError> {
        if self.config.api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let url = format!("{}/search.json", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", engine),
                ("q", query),
                ("hl", &self.config.language),
                ("gl", &self.config.country),
                ("num", &RESULTS_PER_QUERY.to_string()),
                ("api_key", &self.config.api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::BadStatus(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Render organic results as prompt-ready bullet lines
#[must_use]
pub fn snippet_lines(results: &[OrganicResult]) -> String {
    results
        .iter()
        .map(|r| format!("- {}: {}", r.title, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_result_url_prefers_original() {
        let result = ImageResult {
            original: Some("https://img.example/full.jpg".to_string()),
            thumbnail: Some("https://img.example/thumb.jpg".to_string()),
        };
        assert_eq!(result.url(), Some("https://img.example/full.jpg"));
    }

    #[test]
    fn test_image_result_url_falls_back_to_thumbnail() {
        let result = ImageResult {
            original: None,
            thumbnail: Some("https://img.example/thumb.jpg".to_string()),
        };
        assert_eq!(result.url(), Some("https://img.example/thumb.jpg"));
    }

    #[test]
    fn test_image_result_rejects_non_http() {
        let result = ImageResult {
            original: Some("data:image/png;base64,xyz".to_string()),
            thumbnail: None,
        };
        assert_eq!(result.url(), None);
    }

    #[test]
    fn test_snippet_lines() {
        let results = vec![
            OrganicResult {
                title: "Bandhani is back".to_string(),
                snippet: "Tie-dye sarees are trending".to_string(),
                link: None,
            },
            OrganicResult {
                title: "Festival season".to_string(),
                snippet: "Shoppers flock to Johari Bazaar".to_string(),
                link: None,
            },
        ];
        let lines = snippet_lines(&results);
        assert_eq!(
            lines,
            "- Bandhani is back: Tie-dye sarees are trending\n- Festival season: Shoppers flock to Johari Bazaar"
        );
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = SearchError::MissingApiKey;
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
    }
}
