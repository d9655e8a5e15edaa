//! Integration tests for the catalog storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-integration-tests
//! ```
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, so no
//! server or network is needed. The remote feed is disabled and products come
//! from the local dataset.
//!
//! # Test Categories
//!
//! - `storefront_routes` - HTTP behavior of the catalog routes
//! - `catalog_session` - filter, URL and pagination flows on a session

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use catalog_storefront::config::{CatalogConfig, StorefrontConfig};
use catalog_storefront::state::AppState;

/// Origin used for `HX-Current-URL` headers.
pub const ORIGIN: &str = "http://localhost:3000";

/// Configuration that never touches the network.
#[must_use]
pub fn offline_config() -> StorefrontConfig {
    StorefrontConfig {
        catalog: CatalogConfig {
            remote_enabled: false,
            ..CatalogConfig::default()
        },
        ..StorefrontConfig::default()
    }
}

/// Application state with products not yet loaded.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn offline_state() -> AppState {
    AppState::new(offline_config()).expect("offline state")
}

/// State with the local catalog loaded.
pub async fn loaded_state() -> AppState {
    let state = offline_state();
    state.load_catalog().await;
    state
}

/// Router over a loaded local catalog.
pub async fn loaded_app() -> Router {
    catalog_storefront::app(loaded_state().await)
}

/// Plain browser GET.
///
/// # Panics
///
/// Panics if the URI is invalid.
#[must_use]
#[allow(clippy::expect_used)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// HTMX form post issued from the page at `current` (path and query).
///
/// # Panics
///
/// Panics if the URI is invalid.
#[must_use]
#[allow(clippy::expect_used)]
pub fn htmx_post(uri: &str, current: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("HX-Request", "true")
        .header("HX-Current-URL", format!("{ORIGIN}{current}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("valid request")
}

/// Response header value as a string.
#[must_use]
pub fn header_str<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Collect a response body into a string.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
#[allow(clippy::expect_used)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
