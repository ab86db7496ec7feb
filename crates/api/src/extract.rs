//! Request extractors that reject with [`AppError`] instead of axum's plain
//! text responses.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` with JSON error bodies.
///
/// Malformed bodies and missing or mistyped fields are reported as
/// `400 BAD_REQUEST` (axum's own `Json` would answer 415/422 in plain text).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` with JSON error bodies.
///
/// A segment that does not parse as the expected type (`/titles/abc`) is a
/// `404 NOT_FOUND`, as if no route had matched.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `axum::extract::Query` with JSON error bodies (`400 BAD_REQUEST`).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
