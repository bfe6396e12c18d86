//! Integration tests for the store clients
//!
//! The document and object stores are mocked with wiremock; these cover
//! document addressing, the not-found convention, and the product image
//! upload path.

use base64::Engine;
use mandi::config::StoreConfig;
use mandi::models::{NewProduct, StoreProfile, UserSession};
use mandi::store::{DocumentStore, ObjectStore, ProductStore, ProfileStore, StoreError};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_config(document_url: String, object_url: String) -> StoreConfig {
    StoreConfig {
        document_url,
        object_url,
        image_bucket: "product-images".to_string(),
        timeout_secs: 5,
    }
}

fn session() -> UserSession {
    UserSession {
        user_id: "u1".to_string(),
        email: "meera@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_profile_get_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/profiles/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "business_name": "Meera Textiles",
            "owner_name": "Meera Shah",
            "pin_code": "302001"
        })))
        .mount(&server)
        .await;

    let config = store_config(server.uri(), server.uri());
    let profiles = ProfileStore::new(DocumentStore::new(&config).unwrap());

    let profile = profiles.get(&session()).await.unwrap().unwrap();
    assert_eq!(profile.business_name, "Meera Textiles");
    assert_eq!(profile.pin_code, "302001");
    assert!(profile.updated_at.is_none());
}

#[tokio::test]
async fn test_profile_get_missing_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/profiles/u1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = store_config(server.uri(), server.uri());
    let profiles = ProfileStore::new(DocumentStore::new(&config).unwrap());

    assert!(profiles.get(&session()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_profile_upsert_stamps_updated_at() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/profiles/u1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = store_config(server.uri(), server.uri());
    let profiles = ProfileStore::new(DocumentStore::new(&config).unwrap());

    let profile = StoreProfile {
        business_name: "Meera Textiles".to_string(),
        owner_name: "Meera Shah".to_string(),
        pin_code: "302001".to_string(),
        ..Default::default()
    };
    let saved = profiles.upsert(&session(), profile).await.unwrap();
    assert!(saved.updated_at.is_some());
}

#[tokio::test]
async fn test_document_store_surfaces_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = store_config(server.uri(), server.uri());
    let documents = DocumentStore::new(&config).unwrap();

    let result = documents.get::<StoreProfile>("profiles", "u1").await;
    assert!(matches!(
        result,
        Err(StoreError::BadStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_object_store_returns_public_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/product-images/p1.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = store_config(server.uri(), server.uri());
    let objects = ObjectStore::new(&config).unwrap();

    let url = objects
        .upload("p1.jpg", "image/jpeg", b"fake jpeg bytes".to_vec())
        .await
        .unwrap();
    assert_eq!(url, format!("{}/product-images/p1.jpg", server.uri()));
}

fn new_product(image_base64: Option<String>, image_content_type: Option<String>) -> NewProduct {
    NewProduct {
        name: "Block-print dupatta".to_string(),
        category: "Fashion".to_string(),
        description: "Hand block-printed cotton dupatta".to_string(),
        price: 349.0,
        stock: 40,
        image_base64,
        image_content_type,
    }
}

#[tokio::test]
async fn test_product_create_with_image() {
    let documents_server = MockServer::start().await;
    let objects_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/v1/products/[0-9a-f-]+$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&documents_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/product-images/[0-9a-f-]+\.png$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&objects_server)
        .await;

    let config = store_config(documents_server.uri(), objects_server.uri());
    let products = ProductStore::new(
        DocumentStore::new(&config).unwrap(),
        ObjectStore::new(&config).unwrap(),
    );

    let encoded = base64::engine::general_purpose::STANDARD.encode(b"fake png bytes");
    let document = products
        .create(
            &session(),
            new_product(Some(encoded), Some("image/png".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(document.owner_id, "u1");
    let image_url = document.image_url.unwrap();
    assert!(image_url.starts_with(&objects_server.uri()));
    assert!(image_url.ends_with(".png"));
}

#[tokio::test]
async fn test_product_create_without_image_skips_upload() {
    let documents_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/v1/products/[0-9a-f-]+$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&documents_server)
        .await;

    // The object store is unreachable on purpose; no image, no upload
    let config = store_config(
        documents_server.uri(),
        "http://127.0.0.1:1".to_string(),
    );
    let products = ProductStore::new(
        DocumentStore::new(&config).unwrap(),
        ObjectStore::new(&config).unwrap(),
    );

    let document = products
        .create(&session(), new_product(None, None))
        .await
        .unwrap();
    assert!(document.image_url.is_none());
}

#[tokio::test]
async fn test_product_create_rejects_bad_base64() {
    let config = store_config(
        "http://127.0.0.1:1".to_string(),
        "http://127.0.0.1:1".to_string(),
    );
    let products = ProductStore::new(
        DocumentStore::new(&config).unwrap(),
        ObjectStore::new(&config).unwrap(),
    );

    let result = products
        .create(
            &session(),
            new_product(Some("not base64!!".to_string()), None),
        )
        .await;
    assert!(matches!(result, Err(StoreError::ImageDecode(_))));
}
