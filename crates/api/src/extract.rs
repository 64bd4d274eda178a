//! Extractors that turn axum's rejections into [`AppError`] responses.
//!
//! axum answers a malformed body or path with plain text; these wrappers
//! route the rejection through `AppError` so every failure is JSON.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body. Syntax and content-type errors become a `_schema`
/// validation error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Path parameters. Segments that don't parse as ids become 404.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
