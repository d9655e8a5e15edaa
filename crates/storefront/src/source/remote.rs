//! Remote product feed in the DummyJSON shape.
//!
//! Uses `reqwest` 0.13 for HTTP. Successful responses are cached with `moka`
//! so repeated loads within the TTL do not hit the network.

use std::sync::Arc;

use catalog_core::codec::{clamp_rating, parse_number};
use catalog_core::{Product, ProductId, ProductSource, SourceError};
use moka::future::Cache;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogConfig;

/// Client for a remote product feed.
#[derive(Clone)]
pub struct RemoteSource {
    inner: Arc<RemoteSourceInner>,
}

struct RemoteSourceInner {
    client: reqwest::Client,
    url: Url,
    enabled: bool,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl RemoteSource {
    /// Create a client for the configured feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(RemoteSourceInner {
                client,
                url: config.products_url.clone(),
                enabled: config.remote_enabled,
                cache,
            }),
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    /// Drop cached responses so the next load hits the network.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    #[instrument(skip(self), fields(url = %self.inner.url))]
    async fn fetch(&self) -> Result<Vec<Product>, SourceError> {
        let response = self
            .inner
            .client
            .get(self.inner.url.clone())
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let products = parse_products(&body)?;
        debug!(count = products.len(), "Fetched remote products");
        Ok(products)
    }
}

impl ProductSource for RemoteSource {
    async fn load_products(&self) -> Result<Vec<Product>, SourceError> {
        if !self.inner.enabled {
            return Err(SourceError::Unavailable("remote feed disabled".to_string()));
        }

        let key = self.inner.url.to_string();
        if let Some(cached) = self.inner.cache.get(&key).await {
            debug!("Serving products from cache");
            return Ok(cached.as_ref().clone());
        }

        let products = self.fetch().await?;
        self.inner
            .cache
            .insert(key, Arc::new(products.clone()))
            .await;
        Ok(products)
    }
}

// =============================================================================
// Coercion
// =============================================================================

/// Parse a feed body into products.
///
/// The body must be a JSON object with a `products` array. Records are coerced
/// field by field: missing numbers become zero, missing arrays become empty,
/// ratings and discounts are clamped, negative prices become zero. Records
/// without an integer id are skipped.
///
/// # Errors
///
/// Returns `SourceError::Malformed` if the body is not JSON or has no
/// `products` array.
pub fn parse_products(body: &str) -> Result<Vec<Product>, SourceError> {
    let body: Value =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

    let records = body
        .get("products")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Malformed("missing products array".to_string()))?;

    Ok(records.iter().filter_map(coerce_product).collect())
}

fn coerce_product(record: &Value) -> Option<Product> {
    let id = record
        .get("id")
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())?;

    let stock = number(record, "stock")
        .unwrap_or_default()
        .max(Decimal::ZERO)
        .floor()
        .to_u32()
        .unwrap_or(u32::MAX);

    Some(Product {
        id: ProductId::new(id),
        title: text(record, "title"),
        description: text(record, "description"),
        category: text(record, "category"),
        price: number(record, "price")
            .unwrap_or_default()
            .max(Decimal::ZERO),
        discount_percentage: number(record, "discountPercentage")
            .unwrap_or_default()
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        rating: clamp_rating(number(record, "rating").unwrap_or_default()),
        stock,
        tags: strings(record, "tags"),
        brand: optional_text(record, "brand"),
        thumbnail: optional_text(record, "thumbnail"),
        images: strings(record, "images"),
        sku: optional_text(record, "sku"),
        weight: number(record, "weight"),
        availability_status: optional_text(record, "availabilityStatus"),
    })
}

fn number(record: &Value, key: &str) -> Option<Decimal> {
    match record.get(key)? {
        Value::Number(n) => parse_number(&n.to_string()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn text(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_text(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn strings(record: &Value, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
