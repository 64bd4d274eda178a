//! Domain models for the API.
//!
//! Each entity has a row type (what the database and the JSON responses
//! carry) and a validated input type built from a request body.
//!
//! ```text
//! users 1 ──< orders >──< order_product >── products
//! ```

pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product};
pub use user::{NewUser, User};
