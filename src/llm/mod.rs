//! LLM client for trend analysis and listing content generation
//!
//! This module provides LLM integration using an Ollama-style generation
//! endpoint. Model output is free text that usually wraps JSON in markdown
//! code fences; [`extract_json`] recovers the payload.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::error::{ErrorCategory, ErrorClassify};

/// Configuration for the LLM client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Generation endpoint URL (default: http://localhost:11434)
    pub endpoint: String,

    /// Model name for text tasks
    pub model: String,

    /// Model name for image description tasks
    pub vision_model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation (0.0 - 1.0)
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            vision_model: "llama3.2-vision:11b".to_string(),
            timeout_secs: 60,
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

impl LlmConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("MANDI_LLM_ENDPOINT").unwrap_or(defaults.endpoint),
            model: std::env::var("MANDI_LLM_MODEL").unwrap_or(defaults.model),
            vision_model: std::env::var("MANDI_LLM_VISION_MODEL").unwrap_or(defaults.vision_model),
            timeout_secs: std::env::var("MANDI_LLM_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            max_tokens: std::env::var("MANDI_LLM_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: std::env::var("MANDI_LLM_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
        }
    }
}

/// Errors from LLM generation and response handling
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the generation endpoint
    #[error("LLM request failed with status {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// Model returned nothing usable
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// Model output could not be parsed into the expected shape
    #[error("Failed to parse LLM response: {0}")]
    ResponseParse(String),

    /// HTTP client construction failed
    #[error("Failed to create HTTP client: {0}")]
    Init(String),
}

impl ErrorClassify for LlmError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::BadStatus { status, .. } => *status == 429 || *status >= 500,
            Self::EmptyResponse => true,
            Self::ResponseParse(_) => false,
            Self::Init(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) | Self::BadStatus { .. } => ErrorCategory::Network,
            _ => ErrorCategory::Llm,
        }
    }
}

/// Generation request
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
    options: GenerateOptions,
}

/// Generation options
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Generation response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}

/// LLM client
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client with custom config
    pub fn with_config(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Init(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        Self::with_config(LlmConfig::from_env())
    }

    /// Check if the generation endpoint is reachable
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.endpoint);
        self.client.get(&url).send().await.is_ok()
    }

    /// Generate text with the default model
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate_inner(&self.config.model, prompt, None).await
    }

    /// Generate text with a custom temperature (translations run cold)
    pub async fn generate_with_temperature(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            images: None,
            options: GenerateOptions {
                temperature,
                num_predict: self.config.max_tokens,
            },
        };
        self.send(request).await
    }

    /// Describe a base64-encoded image with the vision model
    pub async fn describe_image(
        &self,
        prompt: &str,
        image_base64: &str,
    ) -> Result<String, LlmError> {
        self.generate_inner(
            &self.config.vision_model,
            prompt,
            Some(vec![image_base64.to_string()]),
        )
        .await
    }

    async fn generate_inner(
        &self,
        model: &str,
        prompt: &str,
        images: Option<Vec<String>>,
    ) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
            images,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };
        self.send(request).await
    }

    async fn send(&self, request: GenerateRequest) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.config.endpoint);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::BadStatus { status, body });
        }

        let generated: GenerateResponse = response.json().await?;

        if generated.response.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(generated.response)
    }
}

/// Extract a JSON payload from model output
///
/// Tries, in order: a ```json code fence, a generic code fence, the widest
/// raw object or array. Falls back to the trimmed input.
#[must_use]
pub fn extract_json(text: &str) -> String {
    // Fenced ```json block
    if let Some(start) = text.find("```json") {
        if let Some(end) = text[start + 7..].find("```") {
            return text[start + 7..start + 7 + end].trim().to_string();
        }
    }

    // Generic code fence, skipping a language identifier line if present
    if let Some(start) = text.find("```") {
        let after_start = &text[start + 3..];
        let content_start = after_start.find('\n').map_or(0, |i| i + 1);
        if let Some(end) = after_start[content_start..].find("```") {
            return after_start[content_start..content_start + end]
                .trim()
                .to_string();
        }
    }

    // Raw object or array, whichever opens first
    let object_start = text.find('{');
    let array_start = text.find('[');
    let candidate = match (object_start, array_start) {
        (Some(o), Some(a)) if a < o => span(text, a, ']'),
        (Some(o), _) => span(text, o, '}'),
        (None, Some(a)) => span(text, a, ']'),
        (None, None) => None,
    };
    if let Some(json) = candidate {
        return json;
    }

    text.trim().to_string()
}

fn span(text: &str, start: usize, close: char) -> Option<String> {
    let end = text.rfind(close)?;
    (end > start).then(|| text[start..=end].to_string())
}
