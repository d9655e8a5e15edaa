//! The catalog session: products, filters, pagination and load state in one
//! place.
//!
//! A [`CatalogSession`] owns the navigation store it works against. Every
//! mutation goes through the location and is followed by a re-read, so the
//! view is always what the current URL describes.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::debounce::DEFAULT_INPUT_DEBOUNCE;
use crate::facets::Facets;
use crate::filter::{Filters, matches};
use crate::navigation::Navigation;
use crate::pagination::{DEFAULT_PAGE_SIZE, PageChange, PageLink, PaginationController};
use crate::source::{ProductSource, SourceError};
use crate::summary::{ActiveFilter, active_filters};
use crate::sync::{FilterSync, NumericField, NumericInputs};
use crate::types::Product;

/// Message shown when the product collection could not be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load products.";

/// A loaded product collection with its facets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCatalog {
    products: Vec<Product>,
    facets: Facets,
}

impl LoadedCatalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let facets = Facets::from_products(&products);
        Self { products, facets }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn facets(&self) -> &Facets {
        &self.facets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Lifecycle of the product collection.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(Arc<LoadedCatalog>),
    Failed(String),
}

impl LoadState {
    /// Settle a load attempt. Failures are logged and reduced to
    /// [`LOAD_ERROR_MESSAGE`].
    #[must_use]
    pub fn from_result(result: Result<Vec<Product>, SourceError>) -> Self {
        match result {
            Ok(products) => {
                info!(count = products.len(), "Products loaded");
                Self::Ready(Arc::new(LoadedCatalog::new(products)))
            }
            Err(e) => {
                error!(error = %e, "Failed to load products");
                Self::Failed(LOAD_ERROR_MESSAGE.to_string())
            }
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn catalog(&self) -> Option<&Arc<LoadedCatalog>> {
        match self {
            Self::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Tunables of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub page_size: usize,
    pub input_debounce: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            input_debounce: DEFAULT_INPUT_DEBOUNCE,
        }
    }
}

/// Everything needed to render the catalog for the current location.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub loading: bool,
    pub error: Option<String>,
    /// Products of the current page.
    pub items: Vec<Product>,
    pub filtered_count: usize,
    pub total_count: usize,
    pub current_page: u32,
    pub total_pages: u32,
    pub show_pagination: bool,
    pub pages: Vec<PageLink>,
    pub filters: Filters,
    pub inputs: NumericInputs,
    pub active_filters: Vec<ActiveFilter>,
    pub facets: Facets,
    /// Query string of the current location, without `?`.
    pub query: String,
}

impl CatalogView {
    /// Whether the empty-result message applies.
    #[must_use]
    pub const fn is_empty_result(&self) -> bool {
        !self.loading && self.error.is_none() && self.filtered_count == 0
    }
}

/// The catalog bound to one navigation store.
#[derive(Debug)]
pub struct CatalogSession<N> {
    nav: N,
    state: LoadState,
    sync: FilterSync,
    pagination: PaginationController,
}

impl<N: Navigation> CatalogSession<N> {
    /// Start a session whose products are still loading.
    #[must_use]
    pub fn new(nav: N, options: SessionOptions) -> Self {
        Self::with_state(nav, LoadState::Loading, options)
    }

    /// Start a session over an already settled load state.
    #[must_use]
    pub fn with_state(nav: N, state: LoadState, options: SessionOptions) -> Self {
        let mut session = Self {
            nav,
            state: LoadState::Loading,
            sync: FilterSync::new(Facets::default(), options.input_debounce),
            pagination: PaginationController::new(options.page_size),
        };
        session.set_state(state);
        session
    }

    /// Load the collection from `source`, replacing any previous one.
    pub async fn load<S: ProductSource>(&mut self, source: &S) {
        self.state = LoadState::Loading;
        let result = source.load_products().await;
        self.set_state(LoadState::from_result(result));
    }

    /// Install a settled load state.
    pub fn set_state(&mut self, state: LoadState) {
        if let Some(catalog) = state.catalog() {
            self.sync.set_facets(catalog.facets().clone());
        }
        self.state = state;
        self.sync.observe(&self.nav);
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub const fn navigation(&self) -> &N {
        &self.nav
    }

    /// Mutable access to the store, for back/forward moves.
    ///
    /// Call [`Self::on_navigation`] after changing the location directly.
    pub const fn navigation_mut(&mut self) -> &mut N {
        &mut self.nav
    }

    #[must_use]
    pub fn into_navigation(self) -> N {
        self.nav
    }

    /// Re-read the location after it changed outside the session.
    pub fn on_navigation(&mut self) -> Filters {
        self.sync.observe(&self.nav)
    }

    #[must_use]
    pub fn filters(&self) -> Filters {
        self.sync.filters(&self.nav)
    }

    #[must_use]
    pub const fn inputs(&self) -> &NumericInputs {
        self.sync.inputs()
    }

    #[must_use]
    pub const fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    fn is_ready(&self) -> bool {
        self.state.catalog().is_some()
    }

    // List values are validated against facets, which only exist once
    // products are loaded. Editing before that would drop them from the URL.
    fn edit(&mut self, edit: impl FnOnce(&mut FilterSync, &mut N)) {
        if !self.is_ready() {
            debug!("Ignoring filter change while products are not loaded");
            return;
        }
        edit(&mut self.sync, &mut self.nav);
        self.sync.observe(&self.nav);
    }

    // =========================================================================
    // Filter Operations
    // =========================================================================

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.edit(|sync, nav| sync.set_categories(nav, categories));
    }

    pub fn set_brands(&mut self, brands: Vec<String>) {
        self.edit(|sync, nav| sync.set_brands(nav, brands));
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.edit(|sync, nav| sync.set_tags(nav, tags));
    }

    pub fn toggle_category(&mut self, value: &str) {
        self.edit(|sync, nav| sync.toggle_category(nav, value));
    }

    pub fn toggle_brand(&mut self, value: &str) {
        self.edit(|sync, nav| sync.toggle_brand(nav, value));
    }

    pub fn toggle_tag(&mut self, value: &str) {
        self.edit(|sync, nav| sync.toggle_tag(nav, value));
    }

    pub fn set_in_stock(&mut self, in_stock: bool) {
        self.edit(|sync, nav| sync.set_in_stock(nav, in_stock));
    }

    pub fn set_rating(&mut self, rating: Option<Decimal>) {
        self.edit(|sync, nav| sync.set_rating(nav, rating));
    }

    /// Record typed text; it reaches the URL after [`Self::settle`].
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_input(&mut self, field: NumericField, value: impl Into<String>) {
        self.sync.set_input(field, value);
    }

    /// Wait for typed input to settle and commit it. Returns whether the
    /// location changed.
    pub async fn settle(&mut self) -> bool {
        if !self.is_ready() {
            debug!("Ignoring settled input while products are not loaded");
            return false;
        }
        self.sync.settle(&mut self.nav).await
    }

    /// Commit numeric inputs right away. Returns whether the location changed.
    pub fn commit_inputs(&mut self, inputs: &NumericInputs) -> bool {
        if !self.is_ready() {
            debug!("Ignoring numeric commit while products are not loaded");
            return false;
        }
        let changed = self.sync.commit_inputs(&mut self.nav, inputs);
        if changed {
            self.sync.mirror(&self.nav);
        }
        changed
    }

    /// Clear every filter and the page.
    pub fn reset(&mut self) {
        self.sync.reset(&mut self.nav);
        self.sync.observe(&self.nav);
    }

    /// Remove the filter behind one chip.
    ///
    /// Numeric chips go through the debounced input path, so this must be
    /// called from within a Tokio runtime.
    pub fn remove(&mut self, chip: &ActiveFilter) {
        if chip.numeric_field().is_some() {
            self.sync.remove(&mut self.nav, chip);
        } else {
            self.edit(|sync, nav| sync.remove(nav, chip));
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Move to `page`, adding a history entry.
    pub fn go_to_page(&mut self, page: u32) -> PageChange {
        self.pagination.go_to(&mut self.nav, page)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Compute what the current location shows.
    ///
    /// With products loaded this also corrects an out-of-range page in the
    /// location. Nothing is corrected while loading.
    pub fn view(&mut self) -> CatalogView {
        let filters = self.sync.filters(&self.nav);
        let chips = active_filters(&filters);
        let inputs = self.sync.inputs().clone();

        let Some(catalog) = self.state.catalog().map(Arc::clone) else {
            return CatalogView {
                loading: self.state.is_loading(),
                error: self.state.error().map(str::to_string),
                items: Vec::new(),
                filtered_count: 0,
                total_count: 0,
                current_page: 1,
                total_pages: 0,
                show_pagination: false,
                pages: Vec::new(),
                filters,
                inputs,
                active_filters: chips,
                facets: self.sync.facets().clone(),
                query: self.nav.location().to_query_string(),
            };
        };

        let filtered: Vec<&Product> = catalog
            .products()
            .iter()
            .filter(|p| matches(p, &filters))
            .collect();

        let current_page = self.pagination.reconcile(&mut self.nav, filtered.len());
        let total_pages = self.pagination.total_pages(filtered.len());
        let show_pagination = PaginationController::is_paginated(total_pages);
        let pages = if show_pagination {
            PaginationController::page_links(self.nav.location(), current_page, total_pages)
        } else {
            Vec::new()
        };

        CatalogView {
            loading: false,
            error: None,
            items: self
                .pagination
                .slice(&filtered, current_page)
                .iter()
                .map(|p| (*p).clone())
                .collect(),
            filtered_count: filtered.len(),
            total_count: catalog.len(),
            current_page,
            total_pages,
            show_pagination,
            pages,
            filters,
            inputs,
            active_filters: chips,
            facets: catalog.facets().clone(),
            query: self.nav.location().to_query_string(),
        }
    }
}
