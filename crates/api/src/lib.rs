//! Users, products and orders REST service.
//!
//! This crate provides the API as a library so the router can be built
//! around any [`db::Store`] and exercised without a running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod validation;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the application router with tracing and request ids applied.
///
/// Sentry layers are left to the binary so tests don't need a client.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::db::MemoryStore;

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn test_app() -> Router {
        app(AppState::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let (status, _) = send(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_then_fetch_user() {
        let app = test_app();
        let payload = json!({"name": "Ada", "address": "1 Loop Rd", "email": "ada@example.com"});

        let (status, created) = send(&app, Method::POST, "/users", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/users/{}", created["id"]);
        let (status, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(fetched["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/users/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_is_schema_error() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["fields"]["_schema"].is_array());
    }

    #[tokio::test]
    async fn test_order_lifecycle() {
        let app = test_app();

        let (_, user) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({"name": "Bo", "address": "2 Elm", "email": "bo@example.com"})),
        )
        .await;
        let (_, product) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({"product_name": "Widget", "price": 9.99})),
        )
        .await;
        let (status, order) = send(
            &app,
            Method::POST,
            "/orders",
            Some(json!({"order_date": "2024-05-01", "user_id": user["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let add = format!("/orders/{}/add_product/{}", order["id"], product["id"]);
        let (status, body) = send(&app, Method::PUT, &add, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully added Widget to order!");

        let (status, _) = send(&app, Method::PUT, &add, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let listed = format!("/orders/{}/products", order["id"]);
        let (_, products) = send(&app, Method::GET, &listed, None).await;
        assert_eq!(products.as_array().unwrap().len(), 1);

        let remove = format!("/orders/{}/remove_product/{}", order["id"], product["id"]);
        let (status, body) = send(&app, Method::DELETE, &remove, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            format!(
                "successfully removed product {} from order {}",
                product["id"], order["id"]
            )
        );

        let product_uri = format!("/products/{}", product["id"]);
        let (status, _) = send(&app, Method::GET, &product_uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
