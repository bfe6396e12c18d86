//! Document store client
//!
//! Get/put JSON documents addressed as `/v1/{collection}/{id}` on the
//! hosted document store. Documents are replaced whole; there is no partial
//! update, matching the dashboard's replace-the-whole-value semantics.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::StoreError;
use crate::config::StoreConfig;

/// Client for the hosted document store
#[derive(Clone)]
pub struct DocumentStore {
    client: Client,
    base_url: String,
}

impl DocumentStore {
    /// Create a new document store client
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Init(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.document_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a document, `None` when it does not exist
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let url = self.document_url(collection, id);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(StoreError::BadStatus {
                status: status.as_u16(),
                path: format!("{collection}/{id}"),
            }),
        }
    }

    /// Create or replace a document
    pub async fn put<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        let response = self.client.put(&url).json(document).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::BadStatus {
                status: status.as_u16(),
                path: format!("{collection}/{id}"),
            });
        }

        tracing::debug!(collection = %collection, id = %id, "Document stored");
        Ok(())
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/v1/{collection}/{id}", self.base_url)
    }
}
