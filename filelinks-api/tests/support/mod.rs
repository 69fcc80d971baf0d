//! Shared setup for HTTP-level tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use filelinks_api::{
    create_api_router, ApiConfig, AppState, AuthConfig, FileLinkStore, InMemoryFileLinkStore,
};
use filelinks_core::{new_entity_id, EntityId};
use serde_json::Value;
use tower::ServiceExt;

pub const API_KEY: &str = "integration-key-alice";

/// Shares a long prefix with [`API_KEY`].
pub const SECOND_API_KEY: &str = "integration-key-bob";

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A router over a fresh in-memory store with one registered storage.
pub struct TestApp {
    pub router: Router,
    pub storage_id: EntityId,
    pub store: Arc<InMemoryFileLinkStore>,
}

impl TestApp {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let storage_id = new_entity_id();
        let store = Arc::new(InMemoryFileLinkStore::new());
        let router = router_over(store.clone(), storage_id)?;

        Ok(Self {
            router,
            storage_id,
            store,
        })
    }

    /// POST `body` as raw bytes to the file link collection of `work_package_id`.
    pub async fn post_raw(
        &self,
        work_package_id: EntityId,
        body: impl Into<Body>,
    ) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        self.send(post_request(API_KEY, &collection_uri(work_package_id), body)?).await
    }

    pub async fn post(
        &self,
        work_package_id: EntityId,
        body: &Value,
    ) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        self.post_as(API_KEY, work_package_id, body).await
    }

    pub async fn post_as(
        &self,
        api_key: &str,
        work_package_id: EntityId,
        body: &Value,
    ) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        let request = post_request(api_key, &collection_uri(work_package_id), serde_json::to_vec(body)?)?;
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(uri)
            .header("x-api-key", API_KEY)
            .body(Body::empty())?;
        self.send(request).await
    }

    pub async fn send(
        &self,
        request: Request<Body>,
    ) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        send(&self.router, request).await
    }
}

/// Full router over `store`, with `storage_id` registered and both test keys valid.
pub fn router_over(
    store: Arc<dyn FileLinkStore>,
    storage_id: EntityId,
) -> Result<Router, Box<dyn std::error::Error>> {
    let api_config = ApiConfig::default().with_storage(storage_id);

    let mut auth_config = AuthConfig::default();
    auth_config.add_api_key(API_KEY.to_string());
    auth_config.add_api_key(SECOND_API_KEY.to_string());

    let state = AppState::new(store, &api_config);
    Ok(create_api_router(state, &api_config, auth_config)?)
}

pub fn post_request(
    api_key: &str,
    uri: &str,
    body: impl Into<Body>,
) -> Result<Request<Body>, axum::http::Error> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", api_key)
        .body(body.into())
}

pub async fn send(
    router: &Router,
    request: Request<Body>,
) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

pub fn collection_uri(work_package_id: EntityId) -> String {
    format!("/api/v3/work_packages/{}/file_links", work_package_id)
}

/// Origin ids of the embedded elements of a collection response.
pub fn origin_ids(collection: &Value) -> Vec<String> {
    collection["_embedded"]["elements"]
        .as_array()
        .map(|elements| {
            elements
                .iter()
                .filter_map(|e| e["originData"]["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
