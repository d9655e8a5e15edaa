//! Where products come from.
//!
//! The catalog loads its collection once through a [`ProductSource`]. Sources
//! compose: [`FallbackSource`] tries a primary source and falls back to a
//! secondary one when the primary fails.

use std::future::Future;

use thiserror::Error;
use tracing::warn;

use crate::types::Product;

/// Errors that can occur while loading products.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The response body could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The source is switched off or otherwise not usable.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// A collection of products, loaded asynchronously.
pub trait ProductSource: Send + Sync {
    /// Fetch the full product collection.
    fn load_products(&self) -> impl Future<Output = Result<Vec<Product>, SourceError>> + Send;
}

/// A fixed, already loaded collection.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    products: Vec<Product>,
}

impl StaticSource {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl ProductSource for StaticSource {
    async fn load_products(&self) -> Result<Vec<Product>, SourceError> {
        Ok(self.products.clone())
    }
}

/// Uses `fallback` whenever `primary` fails.
#[derive(Debug, Clone)]
pub struct FallbackSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackSource<P, F> {
    #[must_use]
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    #[must_use]
    pub const fn primary(&self) -> &P {
        &self.primary
    }
}

impl<P: ProductSource, F: ProductSource> ProductSource for FallbackSource<P, F> {
    async fn load_products(&self) -> Result<Vec<Product>, SourceError> {
        match self.primary.load_products().await {
            Ok(products) => Ok(products),
            Err(e) => {
                warn!(error = %e, "Primary product source failed, using fallback");
                self.fallback.load_products().await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::product::fixtures::product;

    struct Failing;

    impl ProductSource for Failing {
        async fn load_products(&self) -> Result<Vec<Product>, SourceError> {
            Err(SourceError::Status(503))
        }
    }

    #[tokio::test]
    async fn test_static_source_returns_products() {
        let source = StaticSource::new(vec![product(1, "A", 5)]);
        let products = source.load_products().await.unwrap();
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_used_on_failure() {
        let source = FallbackSource::new(Failing, StaticSource::new(vec![product(7, "B", 3)]));
        let products = source.load_products().await.unwrap();
        assert_eq!(products[0].id.as_u32(), 7);
    }

    #[tokio::test]
    async fn test_primary_preferred() {
        let source = FallbackSource::new(
            StaticSource::new(vec![product(1, "A", 5)]),
            StaticSource::new(vec![product(2, "B", 5)]),
        );
        let products = source.load_products().await.unwrap();
        assert_eq!(products[0].id.as_u32(), 1);
    }

    #[tokio::test]
    async fn test_both_failing_reports_fallback_error() {
        let source = FallbackSource::new(Failing, Failing);
        let err = source.load_products().await.unwrap_err();
        assert_eq!(err.to_string(), "unexpected status 503");
    }
}
