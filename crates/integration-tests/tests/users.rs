//! User endpoints, driven through the full router.

use axum::http::{Method, StatusCode};
use serde_json::json;

use ecommerce_integration_tests::TestApp;

// =============================================================================
// Create & Fetch
// =============================================================================

#[tokio::test]
async fn test_created_user_round_trips() {
    let app = TestApp::new();
    let payload = json!({"name": "Ada", "address": "1 Loop Rd", "email": "ada@example.com"});

    let (status, created) = app.post("/users", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, fetched) = app.get(&format!("/users/{}", created["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    for field in ["name", "address", "email"] {
        assert_eq!(fetched[field], payload[field], "{field}");
    }
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.create_user("dup@example.com").await;

    let (status, body) = app
        .post(
            "/users",
            json!({"name": "Other", "address": "2 Elm", "email": "dup@example.com"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (_, users) = app.get("/users").await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_email_ignores_case() {
    let app = TestApp::new();
    app.create_user("Ada@Example.com").await;

    let (status, _) = app
        .post(
            "/users",
            json!({"name": "Ada", "address": "1 Loop Rd", "email": "ada@example.com"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_missing_email_is_reported() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/users", json!({"name": "Ada", "address": "1 Loop Rd"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["fields"]["email"][0], "Missing data for required field.");
    assert!(body["fields"].get("name").is_none());
}

#[tokio::test]
async fn test_every_bad_field_is_listed() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/users",
            json!({"name": 7, "address": null, "email": "not-an-email", "age": 30}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["name", "address", "email", "age"] {
        assert!(body["fields"][field].is_array(), "{field} should be reported");
    }
}

#[tokio::test]
async fn test_client_supplied_id_is_ignored() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/users",
            json!({"id": 999, "name": "Ada", "address": "1 Loop Rd", "email": "ada@example.com"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["id"], 999);
}

#[tokio::test]
async fn test_list_is_ordered_by_id() {
    let app = TestApp::new();
    let first = app.create_user("a@example.com").await;
    let second = app.create_user("b@example.com").await;

    let (status, users) = app.get("/users").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

// =============================================================================
// Not Found
// =============================================================================

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/users/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = app.delete("/users/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found_even_with_bad_body() {
    let app = TestApp::new();

    let (status, _) = app.put("/users/4242", Some(json!({"name": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found_with_unparseable_body() {
    let app = TestApp::new();

    let (status, body) = app
        .send_raw(
            Method::PUT,
            "/users/4242",
            Some("application/json"),
            "{not json".to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = app.put("/users/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_existing_user_with_unparseable_body_is_rejected() {
    let app = TestApp::new();
    let id = app.create_user("parse@example.com").await;

    let (status, body) = app
        .send_raw(
            Method::PUT,
            &format!("/users/{id}"),
            Some("application/json"),
            "{not json".to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["_schema"].is_array());
}

// =============================================================================
// Update & Delete
// =============================================================================

#[tokio::test]
async fn test_update_replaces_fields() {
    let app = TestApp::new();
    let id = app.create_user("old@example.com").await;

    let (status, body) = app
        .put(
            &format!("/users/{id}"),
            Some(json!({"name": "New Name", "address": "9 New Rd", "email": "new@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "New Name");
    assert_eq!(body["address"], "9 New Rd");
    assert_eq!(body["email"], "new@example.com");
}

#[tokio::test]
async fn test_update_to_taken_email_conflicts() {
    let app = TestApp::new();
    app.create_user("taken@example.com").await;
    let id = app.create_user("mine@example.com").await;

    let (status, _) = app
        .put(
            &format!("/users/{id}"),
            Some(json!({"name": "Me", "address": "1 Rd", "email": "taken@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new();
    let id = app.create_user("gone@example.com").await;

    let (status, body) = app.delete(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("successfully deleted user {id}"));

    let (status, _) = app.get(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_with_orders_cannot_be_deleted() {
    let app = TestApp::new();
    let id = app.create_user("buyer@example.com").await;
    app.create_order(id, "2024-05-01").await;

    let (status, _) = app.delete(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.get(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
}
