//! Requests that match no handler still get JSON error bodies.

use axum::http::{Method, StatusCode};

use ecommerce_integration_tests::TestApp;

#[tokio::test]
async fn test_unknown_path_is_json_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/customers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource not found");

    let (status, body) = app.get("/orders/1/products/extra").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_wrong_method_is_json_method_not_allowed() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::PATCH, "/users", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let (status, body) = app.delete("/orders").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}
