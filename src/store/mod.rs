//! Clients for the externally hosted persistence services
//!
//! All persistence is delegated to remote services: a document store for
//! profile and product documents, and an object store for image bytes.
//! These clients are deliberately thin request/response wrappers; there is
//! no caching, retry, or local state.

pub mod documents;
pub mod objects;
pub mod product;
pub mod profile;

pub use documents::DocumentStore;
pub use objects::ObjectStore;
pub use product::ProductStore;
pub use profile::ProfileStore;

use thiserror::Error;

use crate::error::{ErrorCategory, ErrorClassify};

/// Errors from the document and object stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Non-success status from the store
    #[error("Store request failed with status {status} for {path}")]
    BadStatus { status: u16, path: String },

    /// Uploaded image payload could not be decoded
    #[error("Failed to decode image payload: {0}")]
    ImageDecode(String),

    /// HTTP client construction failed
    #[error("Failed to create HTTP client: {0}")]
    Init(String),
}

impl ErrorClassify for StoreError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::BadStatus { status, .. } => *status == 429 || *status >= 500,
            Self::NotFound(_) => false,
            Self::ImageDecode(_) => false,
            Self::Init(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) => ErrorCategory::Network,
            Self::ImageDecode(_) => ErrorCategory::Validation,
            _ => ErrorCategory::Store,
        }
    }
}
