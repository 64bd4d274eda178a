//! ecommerce-core - Shared types library.
//!
//! This crate provides the value types used across the workspace:
//! - `api` - The users / products / orders REST service
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database encoding for the types is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Typed entity ids, validated emails and non-negative prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
