//! Keeps the active filters and the URL in step.
//!
//! The location is the single source of truth: [`FilterSync::filters`] decodes
//! it on every call and nothing is cached. Discrete controls (checkboxes,
//! rating, in-stock) push a new history entry per change. The four numeric
//! text inputs keep editable strings locally and reach the URL only after
//! their debouncer settles, through a replace so that typing does not flood
//! the history.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{
    clamp_rating, decode, encode, order_price_range, parse_discount, parse_min_stock, parse_price,
};
use crate::debounce::Debouncer;
use crate::facets::Facets;
use crate::filter::Filters;
use crate::navigation::Navigation;
use crate::query::{QueryParams, keys};
use crate::summary::ActiveFilter;

/// A free-text numeric filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    MinPrice,
    MaxPrice,
    MinDiscount,
    MinStock,
}

impl NumericField {
    pub const ALL: [Self; 4] = [
        Self::MinPrice,
        Self::MaxPrice,
        Self::MinDiscount,
        Self::MinStock,
    ];

    /// Query parameter carrying this field.
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::MinPrice => keys::MIN_PRICE,
            Self::MaxPrice => keys::MAX_PRICE,
            Self::MinDiscount => keys::MIN_DISCOUNT,
            Self::MinStock => keys::MIN_STOCK,
        }
    }

    /// Look a field up by its query parameter name.
    #[must_use]
    pub fn from_param(param: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.param() == param)
    }
}

/// Editable strings of the numeric inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericInputs {
    pub min_price: String,
    pub max_price: String,
    pub min_discount: String,
    pub min_stock: String,
}

impl NumericInputs {
    /// String form of the numeric fields of `filters`; empty when unset.
    #[must_use]
    pub fn from_filters(filters: &Filters) -> Self {
        fn text<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            min_price: text(filters.min_price),
            max_price: text(filters.max_price),
            min_discount: text(filters.min_discount),
            min_stock: text(filters.min_stock),
        }
    }

    #[must_use]
    pub fn get(&self, field: NumericField) -> &str {
        match field {
            NumericField::MinPrice => &self.min_price,
            NumericField::MaxPrice => &self.max_price,
            NumericField::MinDiscount => &self.min_discount,
            NumericField::MinStock => &self.min_stock,
        }
    }

    pub fn set(&mut self, field: NumericField, value: impl Into<String>) {
        let slot = match field {
            NumericField::MinPrice => &mut self.min_price,
            NumericField::MaxPrice => &mut self.max_price,
            NumericField::MinDiscount => &mut self.min_discount,
            NumericField::MinStock => &mut self.min_stock,
        };
        *slot = value.into();
    }

    /// Copy of `filters` with the numeric fields taken from these inputs.
    ///
    /// Parsing, range ordering and capping follow [`decode`] exactly.
    #[must_use]
    pub fn apply_to(&self, filters: &Filters) -> Filters {
        let (min_price, max_price) = order_price_range(
            parse_price(Some(&self.min_price)),
            parse_price(Some(&self.max_price)),
        );

        Filters {
            min_price,
            max_price,
            min_discount: parse_discount(Some(&self.min_discount)),
            min_stock: parse_min_stock(Some(&self.min_stock)),
            ..filters.clone()
        }
    }
}

/// One debouncer per numeric input.
#[derive(Debug)]
struct InputDebouncers {
    min_price: Debouncer<String>,
    max_price: Debouncer<String>,
    min_discount: Debouncer<String>,
    min_stock: Debouncer<String>,
}

impl InputDebouncers {
    fn new(delay: Duration) -> Self {
        Self {
            min_price: Debouncer::new(delay),
            max_price: Debouncer::new(delay),
            min_discount: Debouncer::new(delay),
            min_stock: Debouncer::new(delay),
        }
    }

    fn get_mut(&mut self, field: NumericField) -> &mut Debouncer<String> {
        match field {
            NumericField::MinPrice => &mut self.min_price,
            NumericField::MaxPrice => &mut self.max_price,
            NumericField::MinDiscount => &mut self.min_discount,
            NumericField::MinStock => &mut self.min_stock,
        }
    }

    fn cancel_all(&mut self) {
        for field in NumericField::ALL {
            self.get_mut(field).cancel();
        }
    }

    fn is_pending(&self) -> bool {
        self.min_price.is_pending()
            || self.max_price.is_pending()
            || self.min_discount.is_pending()
            || self.min_stock.is_pending()
    }

    async fn next_settled(&mut self) -> (NumericField, String) {
        tokio::select! {
            value = self.min_price.settled() => (NumericField::MinPrice, value),
            value = self.max_price.settled() => (NumericField::MaxPrice, value),
            value = self.min_discount.settled() => (NumericField::MinDiscount, value),
            value = self.min_stock.settled() => (NumericField::MinStock, value),
        }
    }
}

/// Filter state backed by the navigation store.
#[derive(Debug)]
pub struct FilterSync {
    facets: Facets,
    /// What the user is typing.
    inputs: NumericInputs,
    /// Last value each debouncer emitted.
    settled: NumericInputs,
    /// Numeric filter values last copied into `inputs`.
    mirrored: NumericInputs,
    debouncers: InputDebouncers,
}

impl FilterSync {
    /// Create a controller validating list values against `facets`.
    #[must_use]
    pub fn new(facets: Facets, debounce: Duration) -> Self {
        Self {
            facets,
            inputs: NumericInputs::default(),
            settled: NumericInputs::default(),
            mirrored: NumericInputs::default(),
            debouncers: InputDebouncers::new(debounce),
        }
    }

    #[must_use]
    pub const fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Swap in the facets of a freshly loaded collection.
    pub fn set_facets(&mut self, facets: Facets) {
        self.facets = facets;
    }

    /// Decode the current filters from the location.
    #[must_use]
    pub fn filters<N: Navigation + ?Sized>(&self, nav: &N) -> Filters {
        decode(nav.location(), &self.facets)
    }

    /// Current text of the numeric inputs.
    #[must_use]
    pub const fn inputs(&self) -> &NumericInputs {
        &self.inputs
    }

    /// Whether typed input is still waiting on a debouncer.
    #[must_use]
    pub fn has_pending_input(&self) -> bool {
        self.debouncers.is_pending()
    }

    /// React to a navigation event.
    ///
    /// When the numeric filters in the location differ from the ones last
    /// mirrored (back/forward, reset), the input strings are rewritten from the
    /// location and pending debounces are dropped.
    pub fn observe<N: Navigation + ?Sized>(&mut self, nav: &N) -> Filters {
        let filters = self.filters(nav);
        let mirrored = NumericInputs::from_filters(&filters);
        if mirrored != self.mirrored {
            debug!(?mirrored, "Mirroring numeric inputs from location");
            self.debouncers.cancel_all();
            self.inputs = mirrored.clone();
            self.settled = mirrored.clone();
            self.mirrored = mirrored;
        }
        filters
    }

    /// Rewrite the input strings from the location after a commit made here.
    ///
    /// Unlike [`Self::observe`], fields still being typed keep their debouncers.
    pub fn mirror<N: Navigation + ?Sized>(&mut self, nav: &N) {
        let mirrored = NumericInputs::from_filters(&self.filters(nav));
        self.inputs = mirrored.clone();
        self.settled = mirrored.clone();
        self.mirrored = mirrored;
    }

    // =========================================================================
    // Discrete Controls (push)
    // =========================================================================

    pub fn set_categories<N: Navigation + ?Sized>(&self, nav: &mut N, categories: Vec<String>) {
        self.push_with(nav, |f| f.categories = categories);
    }

    pub fn set_brands<N: Navigation + ?Sized>(&self, nav: &mut N, brands: Vec<String>) {
        self.push_with(nav, |f| f.brands = brands);
    }

    pub fn set_tags<N: Navigation + ?Sized>(&self, nav: &mut N, tags: Vec<String>) {
        self.push_with(nav, |f| f.tags = tags);
    }

    pub fn set_in_stock<N: Navigation + ?Sized>(&self, nav: &mut N, in_stock: bool) {
        self.push_with(nav, |f| f.in_stock = in_stock);
    }

    /// Set the minimum rating. Values are clamped into `0..=5`.
    pub fn set_rating<N: Navigation + ?Sized>(&self, nav: &mut N, rating: Option<Decimal>) {
        let rating = rating.map(clamp_rating);
        self.push_with(nav, |f| f.rating = rating);
    }

    /// Add the category if absent, remove every occurrence otherwise.
    pub fn toggle_category<N: Navigation + ?Sized>(&self, nav: &mut N, value: &str) {
        self.push_with(nav, |f| toggle(&mut f.categories, value));
    }

    pub fn toggle_brand<N: Navigation + ?Sized>(&self, nav: &mut N, value: &str) {
        self.push_with(nav, |f| toggle(&mut f.brands, value));
    }

    pub fn toggle_tag<N: Navigation + ?Sized>(&self, nav: &mut N, value: &str) {
        self.push_with(nav, |f| toggle(&mut f.tags, value));
    }

    fn push_with<N: Navigation + ?Sized>(&self, nav: &mut N, edit: impl FnOnce(&mut Filters)) {
        let mut filters = self.filters(nav);
        edit(&mut filters);
        let params = encode(&filters);
        debug!(query = %params, "Pushing filter change");
        nav.push(params);
    }

    // =========================================================================
    // Numeric Inputs (debounced replace)
    // =========================================================================

    /// Record typed text and restart that field's debouncer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_input(&mut self, field: NumericField, value: impl Into<String>) {
        let value = value.into();
        self.inputs.set(field, value.clone());
        self.debouncers.get_mut(field).push(value);
    }

    /// Wait for a debounced input to settle and commit it.
    ///
    /// The other inputs keep their text and pending debounces, so a later
    /// [`Self::observe`] does not mistake this commit for navigation.
    /// Returns whether the location changed.
    pub async fn settle<N: Navigation + ?Sized>(&mut self, nav: &mut N) -> bool {
        let (field, value) = self.debouncers.next_settled().await;
        self.settled.set(field, value);
        let settled = self.settled.clone();
        let changed = self.commit_inputs(nav, &settled);
        if changed {
            self.mirrored = NumericInputs::from_filters(&self.filters(nav));
        }
        changed
    }

    /// Write the numeric `inputs` into the location with a replace.
    ///
    /// Nothing happens when the parsed values equal the current filters.
    /// Returns whether the location changed.
    pub fn commit_inputs<N: Navigation + ?Sized>(
        &self,
        nav: &mut N,
        inputs: &NumericInputs,
    ) -> bool {
        let current = self.filters(nav);
        let next = inputs.apply_to(&current);
        if next == current {
            return false;
        }
        let params = encode(&next);
        debug!(query = %params, "Replacing location with settled numeric inputs");
        nav.replace(params);
        true
    }

    // =========================================================================
    // Reset & Removal
    // =========================================================================

    /// Clear every parameter in one replace.
    pub fn reset<N: Navigation + ?Sized>(&self, nav: &mut N) {
        debug!("Resetting filters");
        nav.replace(QueryParams::new());
    }

    /// Remove one active filter, the way its chip's delete action does.
    ///
    /// Numeric chips clear their input and go through the debounced path.
    pub fn remove<N: Navigation + ?Sized>(&mut self, nav: &mut N, chip: &ActiveFilter) {
        match chip {
            ActiveFilter::Category(value) => {
                self.push_with(nav, |f| f.categories.retain(|c| c != value));
            }
            ActiveFilter::Brand(value) => {
                self.push_with(nav, |f| f.brands.retain(|b| b != value));
            }
            ActiveFilter::Tag(value) => {
                self.push_with(nav, |f| f.tags.retain(|t| t != value));
            }
            ActiveFilter::Rating(_) => self.set_rating(nav, None),
            ActiveFilter::InStock => self.set_in_stock(nav, false),
            ActiveFilter::MinPrice(_)
            | ActiveFilter::MaxPrice(_)
            | ActiveFilter::MinDiscount(_)
            | ActiveFilter::MinStock(_) => {
                if let Some(field) = chip.numeric_field() {
                    self.set_input(field, String::new());
                }
            }
        }
    }
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if values.iter().any(|v| v == value) {
        values.retain(|v| v != value);
    } else {
        values.push(value.to_string());
    }
}
