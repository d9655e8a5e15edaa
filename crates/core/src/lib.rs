//! Catalog Core - filter, query-string and pagination engine.
//!
//! This crate holds everything about the product catalog that is independent
//! of how pages are served:
//!
//! - [`types`] - Product records and type-safe IDs
//! - [`filter`] - The [`Filters`] value and the predicate applied to products
//! - [`query`] / [`codec`] - Query-string container and the filters <-> URL mapping
//! - [`facets`] - Distinct categories, brands and tags of a loaded collection
//! - [`debounce`] - Trailing-edge debounce on the Tokio timer
//! - [`navigation`] - The URL as a store with push/replace semantics
//! - [`sync`] - Keeps filters and the URL in step
//! - [`pagination`] - Page slicing and self-correction
//! - [`summary`] - Removable chips describing the active filters
//! - [`source`] - Product source seam and the fallback combinator
//! - [`catalog`] - The orchestrator tying it all together
//!
//! # Architecture
//!
//! The crate has no HTTP clients and no templates. State that a browser would
//! keep in its address bar lives behind the [`Navigation`] trait, which every
//! controller receives explicitly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod codec;
pub mod debounce;
pub mod facets;
pub mod filter;
pub mod navigation;
pub mod pagination;
pub mod query;
pub mod source;
pub mod summary;
pub mod sync;
pub mod types;

pub use catalog::{
    CatalogSession, CatalogView, LOAD_ERROR_MESSAGE, LoadState, LoadedCatalog, SessionOptions,
};
pub use codec::{decode, encode, read_page, write_page};
pub use debounce::{DEFAULT_INPUT_DEBOUNCE, Debouncer};
pub use facets::Facets;
pub use filter::{Filters, apply_filters, matches};
pub use navigation::{InMemoryHistory, Navigation, NavigationKind};
pub use pagination::{DEFAULT_PAGE_SIZE, PageChange, PageLink, PaginationController};
pub use query::QueryParams;
pub use source::{FallbackSource, ProductSource, SourceError, StaticSource};
pub use summary::{ActiveFilter, active_filters};
pub use sync::{FilterSync, NumericField, NumericInputs};
pub use types::*;
