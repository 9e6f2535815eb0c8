use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::{app::build_app, state::AppState, storage::StorageClient};

/// Records keys instead of talking to S3.
#[derive(Default)]
pub struct FakeStorage {
    keys: Mutex<Vec<String>>,
}

impl FakeStorage {
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().clone()
    }
}

#[async_trait]
impl StorageClient for FakeStorage {
    async fn put_image(&self, key: &str, _body: Bytes, _ct: &str) -> anyhow::Result<()> {
        self.keys.lock().push(key.to_string());
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> anyhow::Result<String> {
        Ok(format!("https://fake.local/{}?ttl={}", key, ttl.as_secs()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub storage: Arc<FakeStorage>,
}

impl TestApp {
    pub fn new() -> Self {
        let storage = Arc::new(FakeStorage::default());
        let state = AppState::in_memory_with_storage(storage.clone());
        Self {
            router: build_app(state),
            storage,
        }
    }
}

/// Sends a request through the router, returning the status and the JSON body (`Null` if not JSON).
pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
