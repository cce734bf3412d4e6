//! Web Routes
//!
//! Route handlers organized by functionality.

pub mod chat;
pub mod dashboard;
pub mod health;

use axum::http::Uri;

use crate::web::error::WebError;

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> WebError {
    WebError::NotFound(uri.path().to_string())
}
