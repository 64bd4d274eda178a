//! Product route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use tracing::instrument;

use ecommerce_core::ProductId;

use super::MessageResponse;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::extract::{ApiPath, JsonBody};
use crate::models::{NewProduct, Product};
use crate::state::AppState;

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

/// GET /products
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.store().list_products().await?))
}

/// GET /products/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    state
        .store()
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(product_not_found)
}

/// POST /products
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Product>)> {
    let new_product = NewProduct::from_json(&body)?;
    let product = state.store().create_product(&new_product).await?;

    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id}
///
/// Body rejections are held back until the id is known to exist.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
    body: std::result::Result<JsonBody<Value>, AppError>,
) -> Result<Json<Product>> {
    if state.store().get_product(id).await?.is_none() {
        return Err(product_not_found());
    }

    let JsonBody(body) = body?;
    let new_product = NewProduct::from_json(&body)?;
    let product = state
        .store()
        .update_product(id, &new_product)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => product_not_found(),
            other => AppError::from(other),
        })?;

    tracing::info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

/// DELETE /products/{id}
///
/// Also detaches the product from every order it was on.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<MessageResponse>> {
    if !state.store().delete_product(id).await? {
        return Err(product_not_found());
    }

    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(MessageResponse::new(format!(
        "successfully deleted product {id}"
    ))))
}
