//! Unified error handling for the mandi crate
//!
//! This module provides a unified error type that consolidates all
//! domain-specific errors into a single `Error` enum, while maintaining
//! the ability to use domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`ErrorClassify`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::llm::LlmError;
pub use crate::search::SearchError;
pub use crate::store::StoreError;

/// Common trait for all mandi error types
///
/// This trait provides a unified interface for error handling across
/// all modules, enabling consistent error processing strategies.
pub trait ErrorClassify: std::error::Error {
    /// Check if this error is transient (a later identical call may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, upstream failure)
    Network,
    /// Parsing and data extraction errors
    Parsing,
    /// Document/object store errors
    Store,
    /// LLM and AI processing errors
    Llm,
    /// Configuration errors
    Config,
    /// Client-side input validation errors
    Validation,
    /// Missing user identity
    Auth,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Human-readable description for the category
    pub fn desc(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Parsing => "parsing error",
            Self::Store => "store error",
            Self::Llm => "LLM error",
            Self::Config => "configuration error",
            Self::Validation => "validation error",
            Self::Auth => "authentication error",
            Self::Other => "other error",
        }
    }
}

/// Unified error type for the mandi crate
///
/// This enum wraps all domain-specific errors, providing a single error type
/// that can be used across module boundaries while preserving the detailed
/// error information.
#[derive(Error, Debug)]
pub enum Error {
    /// LLM generation and response parsing errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Web/image search errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Document and object store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Input validation errors (rejected before any remote call)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No user identity available; remote store calls are blocked
    #[error("No authenticated user")]
    AuthMissing,

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ErrorClassify for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_recoverable(),
            Self::Search(e) => e.is_recoverable(),
            Self::Store(e) => e.is_recoverable(),
            Self::Io(_) => true, // I/O errors are often transient
            Self::Json(_) => false,
            Self::Http(_) => true, // HTTP errors are often transient
            Self::Config(_) => false,
            Self::Validation(_) => false,
            Self::AuthMissing => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Llm(e) => e.category(),
            Self::Search(e) => e.category(),
            Self::Store(e) => e.category(),
            Self::Io(_) => ErrorCategory::Store,
            Self::Json(_) => ErrorCategory::Parsing,
            Self::Http(_) => ErrorCategory::Network,
            Self::Config(_) => ErrorCategory::Config,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::AuthMissing => ErrorCategory::Auth,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an input validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
