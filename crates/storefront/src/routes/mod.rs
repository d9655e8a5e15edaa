//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to the catalog
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (503 while products load)
//!
//! # Catalog
//! GET  /catalog                - Catalog page (results fragment for HTMX)
//! POST /catalog/filters        - Apply a filter action (HTMX)
//! POST /catalog/page           - Change page (HTMX, triggers scroll to top)
//! POST /catalog/reload         - Reload products (HTMX)
//! ```

pub mod catalog;
pub mod health;
pub mod htmx;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/filters", post(catalog::apply_filter))
        .route("/page", post(catalog::change_page))
        .route("/reload", post(catalog::reload))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/catalog", catalog_routes())
        .fallback(catalog::not_found)
}
