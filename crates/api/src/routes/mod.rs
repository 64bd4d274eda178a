//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                   - Liveness check
//! GET    /health/ready                             - Readiness check (pings the store)
//!
//! # Users
//! GET    /users                                    - List users
//! POST   /users                                    - Create user
//! GET    /users/{id}                               - Fetch user
//! PUT    /users/{id}                               - Replace user
//! DELETE /users/{id}                               - Delete user
//!
//! # Products
//! GET    /products                                 - List products
//! POST   /products                                 - Create product
//! GET    /products/{id}                            - Fetch product
//! PUT    /products/{id}                            - Replace product
//! DELETE /products/{id}                            - Delete product
//!
//! # Orders
//! POST   /orders                                   - Create order
//! GET    /orders/{order_id}                        - Fetch order
//! PUT    /orders/{order_id}/add_product/{product_id}    - Attach product
//! DELETE /orders/{order_id}/remove_product/{product_id} - Detach product
//! GET    /orders/user/{user_id}                    - Orders for a user
//! GET    /orders/{order_id}/products               - Products in an order
//! ```

pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Body returned by operations that have no entity to echo back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Build the complete API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(user_routes())
        .merge(product_routes())
        .merge(order_routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::show).put(users::update).delete(users::destroy),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create))
        .route("/orders/{order_id}", get(orders::show))
        .route(
            "/orders/{order_id}/add_product/{product_id}",
            put(orders::add_product),
        )
        .route(
            "/orders/{order_id}/remove_product/{product_id}",
            delete(orders::remove_product),
        )
        .route("/orders/user/{user_id}", get(orders::list_for_user))
        .route("/orders/{order_id}/products", get(orders::list_products))
}
