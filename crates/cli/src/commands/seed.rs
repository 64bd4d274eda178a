//! Seed the database with sample users and products.
//!
//! Rows are generated deterministically, so re-running the command skips
//! users whose email already exists instead of failing.

use ecommerce_api::db::{PgStore, ProductStore, RepositoryError, UserStore};
use ecommerce_api::models::{NewProduct, NewUser};
use ecommerce_core::{Email, Price};
use tracing::{info, warn};

use super::CommandError;

const STREETS: &[&str] = &["Loop Rd", "Elm St", "Harbor Way", "Mill Ln", "Cedar Ave"];
const PRODUCTS: &[&str] = &["Widget", "Gadget", "Sprocket", "Gizmo", "Doohickey"];

fn sample_user(n: u32) -> Result<NewUser, CommandError> {
    let street = STREETS
        .get(n as usize % STREETS.len())
        .copied()
        .unwrap_or("Main St");
    let email = Email::parse(&format!("user{n}@example.com"))
        .map_err(|e| CommandError::Seed(e.to_string()))?;

    Ok(NewUser {
        name: format!("Sample User {n}"),
        address: format!("{n} {street}"),
        email,
    })
}

fn sample_product(n: u32) -> Result<NewProduct, CommandError> {
    let base = PRODUCTS
        .get(n as usize % PRODUCTS.len())
        .copied()
        .unwrap_or("Item");
    // 4.99, 9.99, 14.99, ...
    let price = Price::new(f64::from(n % 20 + 1).mul_add(5.0, -0.01))
        .map_err(|e| CommandError::Seed(e.to_string()))?;

    Ok(NewProduct {
        product_name: format!("{base} {n}"),
        price,
    })
}

/// Insert `users` sample users and `products` sample products.
///
/// # Errors
///
/// Returns an error if configuration is missing or the database rejects
/// an insert for any reason other than a duplicate email.
pub async fn run(users: u32, products: u32) -> Result<(), CommandError> {
    let store = PgStore::new(super::connect().await?);

    let mut created_users = 0;
    for n in 1..=users {
        match store.create_user(&sample_user(n)?).await {
            Ok(user) => {
                created_users += 1;
                info!(user_id = %user.id, email = %user.email, "Seeded user");
            }
            Err(RepositoryError::Conflict(_)) => {
                warn!(n, "Sample user already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    for n in 1..=products {
        let product = store.create_product(&sample_product(n)?).await?;
        info!(product_id = %product.id, name = %product.product_name, "Seeded product");
    }

    info!(users = created_users, products, "Seeding complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_users_have_distinct_emails() {
        let a = sample_user(1).unwrap();
        let b = sample_user(2).unwrap();
        assert_ne!(a.email, b.email);
        assert_eq!(a.email.as_str(), "user1@example.com");
    }

    #[test]
    fn test_sample_user_fits_column_limits() {
        let user = sample_user(u32::MAX).unwrap();
        assert!(user.name.chars().count() <= 50);
        assert!(user.address.chars().count() <= 200);
    }

    #[test]
    fn test_sample_product_price_is_valid() {
        let product = sample_product(0).unwrap();
        assert_eq!(product.product_name, "Widget 0");
        assert!((product.price.as_f64() - 4.99).abs() < 1e-9);

        let product = sample_product(19).unwrap();
        assert!((product.price.as_f64() - 99.99).abs() < 1e-9);
    }
}
