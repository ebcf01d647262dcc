//! Request extractors with API-shaped rejections.

use crate::error::HttpError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejections render as `400 {"error": …}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(HttpError))]
pub struct ApiJson<T>(pub T);
