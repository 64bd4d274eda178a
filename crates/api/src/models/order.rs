//! Order domain types.
//!
//! An order belongs to exactly one user. Products are attached through the
//! `order_product` association and are not part of the order's own JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ecommerce_core::{OrderId, UserId};

use crate::validation::{FieldReader, ValidationErrors};

/// An order placed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub order_date: NaiveDate,
    pub user_id: UserId,
}

/// Validated fields for creating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_date: NaiveDate,
    pub user_id: UserId,
}

impl NewOrder {
    const FIELDS: &'static [&'static str] = &["order_date", "user_id"];

    /// Validate a request body.
    ///
    /// Only shape is checked here; whether `user_id` exists is up to the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns every offending field when `body` is not a valid order.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(body, Self::FIELDS)?;

        let order_date = reader.date("order_date");
        let user_id = reader.integer("user_id").map(UserId::new);

        let errors = reader.finish();
        match (order_date, user_id) {
            (Some(order_date), Some(user_id)) if errors.is_empty() => Ok(Self {
                order_date,
                user_id,
            }),
            _ => Err(errors),
        }
    }

    /// The order this input produces once stored under `id`.
    #[must_use]
    pub const fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            order_date: self.order_date,
            user_id: self.user_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::{MISSING, NOT_DATE, NOT_INTEGER};

    #[test]
    fn test_valid_order() {
        let order =
            NewOrder::from_json(&json!({"user_id": 1, "order_date": "2024-05-01"})).unwrap();
        assert_eq!(order.user_id, UserId::new(1));
        assert_eq!(order.order_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_missing_fields() {
        let errors = NewOrder::from_json(&json!({})).unwrap_err();
        assert_eq!(errors.get("user_id").unwrap(), [MISSING]);
        assert_eq!(errors.get("order_date").unwrap(), [MISSING]);
    }

    #[test]
    fn test_malformed_fields() {
        let errors =
            NewOrder::from_json(&json!({"user_id": "one", "order_date": "05/01/2024"}))
                .unwrap_err();
        assert_eq!(errors.get("user_id").unwrap(), [NOT_INTEGER]);
        assert_eq!(errors.get("order_date").unwrap(), [NOT_DATE]);
    }

    #[test]
    fn test_serializes_iso_date() {
        let order = Order {
            id: OrderId::new(2),
            order_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            user_id: UserId::new(7),
        };
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({"id": 2, "order_date": "2024-05-01", "user_id": 7})
        );
    }
}
