//! Integration tests for the ecommerce API.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests against the in-memory store
//! cargo test -p ecommerce-integration-tests
//!
//! # Live tests against a running server backed by PostgreSQL
//! API_BASE_URL=http://localhost:5000 cargo test -p ecommerce-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `users`, `products`, `orders`, `routing` - drive the full router in-process
//! - `live_api` - real HTTP against `API_BASE_URL` (ignored by default)

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use ecommerce_api::db::MemoryStore;
use ecommerce_api::state::AppState;
use ecommerce_core::OrderId;

/// Base URL for the live API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A router wired to a fresh in-memory store.
pub struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = ecommerce_api::app(AppState::new(store.clone()));
        Self { router, store }
    }

    /// Number of association rows for `order_id`, read straight from the store.
    #[must_use]
    pub fn association_count(&self, order_id: i64) -> usize {
        let id = i32::try_from(order_id).unwrap();
        self.store.association_count(OrderId::new(id))
    }

    /// Send a request and decode the JSON response (`Null` for non-JSON bodies).
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(body) => {
                self.send_raw(method, uri, Some("application/json"), body.to_string())
                    .await
            }
            None => self.send_raw(method, uri, None, String::new()).await,
        }
    }

    /// Send `body` verbatim, with an optional content type.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Create a user and return its id.
    pub async fn create_user(&self, email: &str) -> i64 {
        let (status, body) = self
            .post(
                "/users",
                json!({"name": "Test User", "address": "1 Test St", "email": email}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    /// Create a product and return its id.
    pub async fn create_product(&self, name: &str, price: f64) -> i64 {
        let (status, body) = self
            .post("/products", json!({"product_name": name, "price": price}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    /// Create an order for `user_id` and return its id.
    pub async fn create_order(&self, user_id: i64, date: &str) -> i64 {
        let (status, body) = self
            .post("/orders", json!({"order_date": date, "user_id": user_id}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}
