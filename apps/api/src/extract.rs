//! Request extractors whose rejections use the `{message, code}` error body.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` for request bodies. Malformed, mistyped or incomplete JSON
/// is answered as a 400 validation error instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
