//! Product persistence.

use async_trait::async_trait;

use ecommerce_core::ProductId;

use super::{PgStore, RepositoryError};
use crate::models::{NewProduct, Product};

/// Storage operations on products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, ordered by id.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// A product by id, `None` if absent.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product.
    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError>;

    /// Replace every field of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    async fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError>;

    /// Delete a product and its order associations. Returns `false` if the
    /// product didn't exist.
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, product_name, price
            FROM products
            ORDER BY id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, product_name, price
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(product)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (product_name, price)
            VALUES ($1, $2)
            RETURNING id, product_name, price
            ",
        )
        .bind(&product.product_name)
        .bind(product.price)
        .fetch_one(self.pool())
        .await?;

        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            UPDATE products
            SET product_name = $2, price = $3
            WHERE id = $1
            RETURNING id, product_name, price
            ",
        )
        .bind(id)
        .bind(&product.product_name)
        .bind(product.price)
        .fetch_optional(self.pool())
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        // order_product rows go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
