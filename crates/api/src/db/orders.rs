//! Order and order/product association persistence.
//!
//! The association is a plain `(order_id, product_id)` join table with a
//! composite primary key, so a pair can exist at most once no matter how
//! requests interleave.

use async_trait::async_trait;

use ecommerce_core::{OrderId, ProductId, UserId};

use super::{PgStore, RepositoryError, is_foreign_key_violation};
use crate::models::{NewOrder, Order, Product};

/// Outcome of attaching a product to an order.
#[derive(Debug, Clone, PartialEq)]
pub enum AddProductOutcome {
    /// The association was created.
    Added(Product),
    /// The product was already on the order; nothing changed.
    AlreadyPresent,
    /// The order does not exist.
    OrderNotFound,
    /// The product does not exist.
    ProductNotFound,
}

/// Outcome of detaching a product from an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveProductOutcome {
    /// The association was deleted; the product itself is untouched.
    Removed,
    /// The product is not on the order.
    NotInOrder,
    /// The order does not exist.
    OrderNotFound,
}

/// Storage operations on orders and their products.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `order.user_id` doesn't exist.
    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError>;

    /// An order by id, `None` if absent.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Orders owned by `user_id`, ordered by id.
    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// Products attached to `order_id`, ordered by product id.
    async fn list_order_products(&self, order_id: OrderId)
    -> Result<Vec<Product>, RepositoryError>;

    /// Attach a product to an order.
    async fn add_product_to_order(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<AddProductOutcome, RepositoryError>;

    /// Detach a product from an order without deleting the product.
    async fn remove_product_from_order(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<RemoveProductOutcome, RepositoryError>;
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (order_date, user_id)
            VALUES ($1, $2)
            RETURNING id, order_date, user_id
            ",
        )
        .bind(order.order_date)
        .bind(order.user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            SELECT id, order_date, user_id
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(order)
    }

    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, order_date, user_id
            FROM orders
            WHERE user_id = $1
            ORDER BY id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(orders)
    }

    async fn list_order_products(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT p.id, p.product_name, p.price
            FROM products p
            JOIN order_product op ON op.product_id = p.id
            WHERE op.order_id = $1
            ORDER BY p.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool())
        .await?;

        Ok(products)
    }

    async fn add_product_to_order(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<AddProductOutcome, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        // Lock both rows so neither can be deleted before the insert lands.
        let order_exists = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM orders WHERE id = $1 FOR SHARE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .is_some();
        if !order_exists {
            return Ok(AddProductOutcome::OrderNotFound);
        }

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, product_name, price FROM products WHERE id = $1 FOR SHARE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(product) = product else {
            return Ok(AddProductOutcome::ProductNotFound);
        };

        let inserted = sqlx::query(
            r"
            INSERT INTO order_product (order_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (order_id, product_id) DO NOTHING
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if inserted == 0 {
            Ok(AddProductOutcome::AlreadyPresent)
        } else {
            Ok(AddProductOutcome::Added(product))
        }
    }

    async fn remove_product_from_order(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<RemoveProductOutcome, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let order_exists = sqlx::query_scalar::<_, i32>("SELECT id FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !order_exists {
            return Ok(RemoveProductOutcome::OrderNotFound);
        }

        let removed = sqlx::query(
            r"
            DELETE FROM order_product
            WHERE order_id = $1 AND product_id = $2
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if removed == 0 {
            Ok(RemoveProductOutcome::NotInOrder)
        } else {
            Ok(RemoveProductOutcome::Removed)
        }
    }
}
