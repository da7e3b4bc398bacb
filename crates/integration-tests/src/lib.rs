//! Integration tests for StockVision.
//!
//! The tests exercise the full router in-process via `tower::ServiceExt`,
//! with the store seeded from the demo catalog. No external services are
//! required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockvision-integration-tests
//! ```

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use stockvision_server::config::ServerConfig;
use stockvision_server::middleware::USER_ID_HEADER;
use stockvision_server::state::AppState;
use stockvision_server::store::{MemoryStore, seed};

/// An in-process server instance plus a handle on its backing store.
pub struct TestContext {
    app: Router,
    store: MemoryStore,
}

impl TestContext {
    /// Build an app over a store preloaded with the demo catalog.
    pub async fn seeded() -> Self {
        let store = MemoryStore::new();
        seed::demo_data(&store).await;
        Self::with_store(store)
    }

    /// Build an app over the given store.
    #[must_use]
    pub fn with_store(store: MemoryStore) -> Self {
        let state = AppState::new(ServerConfig::default(), store.clone())
            .expect("reorder client is not configured in tests");
        Self {
            app: stockvision_server::app(state),
            store,
        }
    }

    /// Direct handle on the store behind the app, for seeding and asserting.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// GET `path` without a caller identity.
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None, None).await
    }

    /// GET `path` as `user`.
    pub async fn get_as(&self, path: &str, user: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, Some(user), None).await
    }

    /// POST a JSON `body` to `path` without a caller identity.
    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, None, Some(body)).await
    }

    /// POST a JSON `body` to `path` as `user`.
    pub async fn post_json_as(&self, path: &str, user: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(user), Some(body)).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");

        // Error responses are plain text; wrap them so callers can still
        // assert on the message.
        let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        });
        (status, value)
    }
}

/// One checkout line in the wire format of `POST /api/pos/checkout`.
#[must_use]
pub fn line(product_id: &str, quantity: u32) -> Value {
    serde_json::json!({ "productId": product_id, "quantity": quantity })
}

/// A full checkout request body.
#[must_use]
pub fn checkout_body(lines: &[Value]) -> Value {
    serde_json::json!({ "lines": lines })
}
