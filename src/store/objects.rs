//! Object store client for image bytes
//!
//! Uploads go to `PUT /{bucket}/{object}`; the stored object is then
//! referenced everywhere by its constructed public URL.

use reqwest::Client;
use std::time::Duration;

use super::StoreError;
use crate::config::StoreConfig;

/// Client for the hosted object store
#[derive(Clone)]
pub struct ObjectStore {
    client: Client,
    base_url: String,
    bucket: String,
}

impl ObjectStore {
    /// Create a new object store client
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Init(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.object_url.trim_end_matches('/').to_string(),
            bucket: config.image_bucket.clone(),
        })
    }

    /// Upload bytes and return the public URL of the stored object
    pub async fn upload(
        &self,
        object: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let url = self.object_url(object);

        let response = self
            .client
            .put(&url)
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::BadStatus {
                status: status.as_u16(),
                path: format!("{}/{object}", self.bucket),
            });
        }

        tracing::debug!(object = %object, bucket = %self.bucket, "Image uploaded");
        Ok(url)
    }

    fn object_url(&self, object: &str) -> String {
        format!("{}/{}/{object}", self.base_url, self.bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_object_url_shape() {
        let mut config = Config::default().store;
        config.object_url = "http://objects.local".to_string();
        config.image_bucket = "product-images".to_string();
        let store = ObjectStore::new(&config).unwrap();
        assert_eq!(
            store.object_url("p1.jpg"),
            "http://objects.local/product-images/p1.jpg"
        );
    }
}
