//! In-memory [`Store`] for tests.
//!
//! Mirrors the `PostgreSQL` schema's constraints: unique emails, orders
//! that must reference a user, users that cannot be deleted while they own
//! orders, and association rows that disappear with their product or order.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use ecommerce_core::{OrderId, ProductId, UserId};

use super::{
    AddProductOutcome, OrderStore, ProductStore, RemoveProductOutcome, RepositoryError, Store,
    UserStore,
};
use crate::models::{NewOrder, NewProduct, NewUser, Order, Product, User};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    order_products: BTreeSet<(OrderId, ProductId)>,
    last_id: i32,
}

impl Tables {
    /// One sequence for every table; ids only need to be unique per table.
    const fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    /// Mirrors the `lower(email)` unique index.
    fn email_taken(&self, user: &NewUser, except: Option<UserId>) -> bool {
        let wanted = user.email.as_str().to_lowercase();
        self.users
            .values()
            .any(|u| u.email.as_str().to_lowercase() == wanted && Some(u.id) != except)
    }
}

/// A [`Store`] that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of association rows for `order_id`.
    #[must_use]
    pub fn association_count(&self, order_id: OrderId) -> usize {
        self.lock()
            .order_products
            .iter()
            .filter(|(order, _)| *order == order_id)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock cannot leave the maps half-updated,
        // so a poisoned lock is still usable.
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.lock();
        if tables.email_taken(user, None) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        let id = UserId::new(tables.next_id());
        let created = user.clone().into_user(id);
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: UserId, user: &NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.email_taken(user, Some(id)) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        let updated = user.clone().into_user(id);
        tables.users.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&id) {
            return Ok(false);
        }
        if tables.orders.values().any(|o| o.user_id == id) {
            return Err(RepositoryError::Conflict("user still has orders".to_owned()));
        }
        tables.users.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.lock().products.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.lock().products.get(&id).cloned())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.lock();
        let id = ProductId::new(tables.next_id());
        let created = product.clone().into_product(id);
        tables.products.insert(id, created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.lock();
        let slot = tables
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = product.clone().into_product(id);
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        if tables.products.remove(&id).is_none() {
            return Ok(false);
        }
        tables.order_products.retain(|(_, product)| *product != id);
        Ok(true)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&order.user_id) {
            return Err(RepositoryError::NotFound);
        }
        let id = OrderId::new(tables.next_id());
        let created = order.clone().into_order(id);
        tables.orders.insert(id, created.clone());
        Ok(created)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .lock()
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_order_products(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .order_products
            .iter()
            .filter(|(order, _)| *order == order_id)
            .filter_map(|(_, product)| tables.products.get(product).cloned())
            .collect())
    }

    async fn add_product_to_order(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<AddProductOutcome, RepositoryError> {
        let mut tables = self.lock();
        if !tables.orders.contains_key(&order_id) {
            return Ok(AddProductOutcome::OrderNotFound);
        }
        let Some(product) = tables.products.get(&product_id).cloned() else {
            return Ok(AddProductOutcome::ProductNotFound);
        };
        if tables.order_products.insert((order_id, product_id)) {
            Ok(AddProductOutcome::Added(product))
        } else {
            Ok(AddProductOutcome::AlreadyPresent)
        }
    }

    async fn remove_product_from_order(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<RemoveProductOutcome, RepositoryError> {
        let mut tables = self.lock();
        if !tables.orders.contains_key(&order_id) {
            return Ok(RemoveProductOutcome::OrderNotFound);
        }
        if tables.order_products.remove(&(order_id, product_id)) {
            Ok(RemoveProductOutcome::Removed)
        } else {
            Ok(RemoveProductOutcome::NotInOrder)
        }
    }
}
