//! Product store
//!
//! Creates product documents. Image bytes are decoded from the submission,
//! uploaded to the object store, and referenced by their constructed URL;
//! the document itself only carries the reference.

use base64::Engine;
use chrono::Utc;
use uuid::Uuid;

use super::{DocumentStore, ObjectStore, StoreError};
use crate::models::{NewProduct, ProductDocument, UserSession};

const COLLECTION: &str = "products";

/// Product document store with image upload
#[derive(Clone)]
pub struct ProductStore {
    documents: DocumentStore,
    objects: ObjectStore,
}

impl ProductStore {
    /// Create a new product store
    pub fn new(documents: DocumentStore, objects: ObjectStore) -> Self {
        Self { documents, objects }
    }

    /// Create a product document for a user
    pub async fn create(
        &self,
        session: &UserSession,
        product: NewProduct,
    ) -> Result<ProductDocument, StoreError> {
        let id = Uuid::new_v4();

        let image_url = match &product.image_base64 {
            Some(encoded) => Some(self.upload_image(id, encoded, &product).await?),
            None => None,
        };

        let document = ProductDocument {
            id,
            owner_id: session.user_id.clone(),
            name: product.name,
            category: product.category,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url,
            created_at: Utc::now(),
        };

        self.documents
            .put(COLLECTION, &id.to_string(), &document)
            .await?;

        tracing::info!(user = %session.user_id, product = %id, "Product created");
        Ok(document)
    }

    async fn upload_image(
        &self,
        id: Uuid,
        encoded: &str,
        product: &NewProduct,
    ) -> Result<String, StoreError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| StoreError::ImageDecode(e.to_string()))?;

        let content_type = product
            .image_content_type
            .as_deref()
            .unwrap_or("image/jpeg");
        let extension = extension_for(content_type);

        self.objects
            .upload(&format!("{id}.{extension}"), content_type, bytes)
            .await
    }
}

/// File extension for the stored object, derived from the MIME type
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}
