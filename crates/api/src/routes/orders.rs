//! Order route handlers.
//!
//! Orders link a user to any number of products through the
//! `order_product` association. The handlers here only translate store
//! outcomes into HTTP; existence checks and the association itself are
//! settled inside the store.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use tracing::instrument;

use ecommerce_core::{OrderId, ProductId, UserId};

use super::MessageResponse;
use crate::db::{AddProductOutcome, RemoveProductOutcome, RepositoryError};
use crate::error::{AppError, Result};
use crate::extract::{ApiPath, JsonBody};
use crate::models::{NewOrder, Order, Product};
use crate::state::AppState;

fn order_not_found() -> AppError {
    AppError::NotFound("Order not found".to_string())
}

/// Create an order for an existing user.
///
/// POST /orders
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Order>)> {
    let new_order = NewOrder::from_json(&body)?;
    let order = state
        .store()
        .create_order(&new_order)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("User not found".to_string()),
            other => AppError::from(other),
        })?;

    tracing::info!(order_id = %order.id, user_id = %order.user_id, "Order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/{order_id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<OrderId>,
) -> Result<Json<Order>> {
    state
        .store()
        .get_order(order_id)
        .await?
        .map(Json)
        .ok_or_else(order_not_found)
}

/// Attach a product to an order.
///
/// PUT /orders/{order_id}/add_product/{product_id}
#[instrument(skip(state))]
pub async fn add_product(
    State(state): State<AppState>,
    ApiPath((order_id, product_id)): ApiPath<(OrderId, ProductId)>,
) -> Result<Json<MessageResponse>> {
    match state
        .store()
        .add_product_to_order(order_id, product_id)
        .await?
    {
        AddProductOutcome::Added(product) => {
            tracing::info!(%order_id, %product_id, "Product added to order");
            Ok(Json(MessageResponse::new(format!(
                "Successfully added {} to order!",
                product.product_name
            ))))
        }
        AddProductOutcome::AlreadyPresent => {
            Err(AppError::Conflict("Product already in order".to_string()))
        }
        AddProductOutcome::OrderNotFound => Err(order_not_found()),
        AddProductOutcome::ProductNotFound => {
            Err(AppError::NotFound("Product not found".to_string()))
        }
    }
}

/// Detach a product from an order. The product itself is kept.
///
/// DELETE /orders/{order_id}/remove_product/{product_id}
#[instrument(skip(state))]
pub async fn remove_product(
    State(state): State<AppState>,
    ApiPath((order_id, product_id)): ApiPath<(OrderId, ProductId)>,
) -> Result<Json<MessageResponse>> {
    match state
        .store()
        .remove_product_from_order(order_id, product_id)
        .await?
    {
        RemoveProductOutcome::Removed => {
            tracing::info!(%order_id, %product_id, "Product removed from order");
            Ok(Json(MessageResponse::new(format!(
                "successfully removed product {product_id} from order {order_id}"
            ))))
        }
        RemoveProductOutcome::NotInOrder => Err(AppError::NotFound(
            "Product not found in order".to_string(),
        )),
        RemoveProductOutcome::OrderNotFound => Err(order_not_found()),
    }
}

/// GET /orders/user/{user_id}
#[instrument(skip(state))]
pub async fn list_for_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.store().list_orders_for_user(user_id).await?))
}

/// GET /orders/{order_id}/products
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<OrderId>,
) -> Result<Json<Vec<Product>>> {
    if state.store().get_order(order_id).await?.is_none() {
        return Err(order_not_found());
    }

    Ok(Json(state.store().list_order_products(order_id).await?))
}
