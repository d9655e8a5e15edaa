//! Product sources backing the storefront.
//!
//! Products come from a remote JSON feed and fall back to a deterministic local
//! dataset whenever the feed is disabled or unusable.

mod local;
mod remote;

pub use local::{LOCAL_CATEGORIES, LOCAL_PRODUCT_COUNT, LocalSource};
pub use remote::{RemoteSource, parse_products};

use catalog_core::FallbackSource;

/// The source the storefront loads its catalog from.
pub type CatalogSource = FallbackSource<RemoteSource, LocalSource>;
