//! Product domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ecommerce_core::{Price, PriceError, ProductId};

use crate::validation::{FieldReader, NEGATIVE, NOT_FINITE, ValidationErrors};

/// A product that can be added to orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub price: Price,
}

/// Validated fields for creating or replacing a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_name: String,
    pub price: Price,
}

impl Product {
    /// Maximum length of `product_name`.
    pub const NAME_MAX: usize = 100;
}

impl NewProduct {
    const FIELDS: &'static [&'static str] = &["product_name", "price"];

    /// Validate a request body.
    ///
    /// # Errors
    ///
    /// Returns every offending field when `body` is not a valid product.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(body, Self::FIELDS)?;

        let product_name = reader.string("product_name", Product::NAME_MAX);
        let price = reader
            .number("price")
            .and_then(|amount| match Price::new(amount) {
                Ok(price) => Some(price),
                Err(PriceError::Negative) => {
                    reader.reject("price", NEGATIVE);
                    None
                }
                Err(PriceError::NotFinite) => {
                    reader.reject("price", NOT_FINITE);
                    None
                }
            });

        let errors = reader.finish();
        match (product_name, price) {
            (Some(product_name), Some(price)) if errors.is_empty() => Ok(Self {
                product_name,
                price,
            }),
            _ => Err(errors),
        }
    }

    /// The product this input produces once stored under `id`.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            product_name: self.product_name,
            price: self.price,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::{MISSING, NOT_NUMBER};

    #[test]
    fn test_valid_product() {
        let product = NewProduct::from_json(&json!({"product_name": "Widget", "price": 9.99}))
            .unwrap();
        assert_eq!(product.product_name, "Widget");
        assert!((product.price.as_f64() - 9.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_integer_price_is_a_number() {
        let product =
            NewProduct::from_json(&json!({"product_name": "Widget", "price": 3})).unwrap();
        assert!((product.price.as_f64() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_must_be_a_number() {
        let errors =
            NewProduct::from_json(&json!({"product_name": "Widget", "price": "cheap"}))
                .unwrap_err();
        assert_eq!(errors.get("price").unwrap(), [NOT_NUMBER]);
    }

    #[test]
    fn test_negative_price_rejected() {
        let errors =
            NewProduct::from_json(&json!({"product_name": "Widget", "price": -1})).unwrap_err();
        assert_eq!(errors.get("price").unwrap(), [NEGATIVE]);
    }

    #[test]
    fn test_missing_everything() {
        let errors = NewProduct::from_json(&json!({})).unwrap_err();
        assert_eq!(errors.get("product_name").unwrap(), [MISSING]);
        assert_eq!(errors.get("price").unwrap(), [MISSING]);
    }
}
