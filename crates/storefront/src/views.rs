//! Display data for catalog templates.
//!
//! Converts a [`CatalogView`] into flat, template-friendly structs so the
//! templates only loop and print.

use std::time::Duration;

use catalog_core::{ActiveFilter, CatalogView, NumericInputs, PageLink, Product};
use rust_decimal::Decimal;

/// Product card data for templates.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub brand: Option<String>,
    pub image: Option<String>,
    pub price: Decimal,
    /// Price after discount, when there is one.
    pub sale_price: Option<Decimal>,
    /// Whole-percent discount badge.
    pub discount: Option<Decimal>,
    pub rating: Decimal,
    pub stock: u32,
    pub in_stock: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let has_discount = product.discount_percentage > Decimal::ZERO;
        Self {
            id: product.id.as_u32(),
            title: product.title.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            image: product
                .images
                .first()
                .or(product.thumbnail.as_ref())
                .cloned(),
            price: product.price,
            sale_price: has_discount.then(|| product.discounted_price()),
            discount: has_discount.then(|| product.discount_percentage.round()),
            rating: product.rating.round_dp(1),
            stock: product.stock,
            in_stock: product.in_stock(),
        }
    }
}

/// One selectable facet value.
#[derive(Debug, Clone)]
pub struct FacetOption {
    pub value: String,
    pub checked: bool,
}

/// A group of facet checkboxes.
#[derive(Debug, Clone)]
pub struct FacetGroup {
    pub title: &'static str,
    /// Filter action sent when a value is toggled.
    pub action: &'static str,
    pub options: Vec<FacetOption>,
}

impl FacetGroup {
    fn new(
        title: &'static str,
        action: &'static str,
        values: &[String],
        selected: &[String],
    ) -> Self {
        Self {
            title,
            action,
            options: values
                .iter()
                .map(|value| FacetOption {
                    value: value.clone(),
                    checked: selected.contains(value),
                })
                .collect(),
        }
    }
}

/// Entry of the minimum rating select.
#[derive(Debug, Clone)]
pub struct RatingOption {
    pub value: u8,
    pub selected: bool,
}

/// Removable chip for one active filter.
#[derive(Debug, Clone)]
pub struct ChipView {
    pub key: String,
    pub label: String,
    /// Filter action removing this chip.
    pub action: &'static str,
    pub value: String,
}

impl From<&ActiveFilter> for ChipView {
    fn from(chip: &ActiveFilter) -> Self {
        let (action, value) = match chip {
            ActiveFilter::Category(v) => ("toggle_category", v.clone()),
            ActiveFilter::Brand(v) => ("toggle_brand", v.clone()),
            ActiveFilter::Tag(v) => ("toggle_tag", v.clone()),
            ActiveFilter::Rating(_) => ("set_rating", String::new()),
            ActiveFilter::InStock => ("set_in_stock", String::new()),
            ActiveFilter::MinPrice(_)
            | ActiveFilter::MaxPrice(_)
            | ActiveFilter::MinDiscount(_)
            | ActiveFilter::MinStock(_) => (
                "clear",
                chip.numeric_field()
                    .map(|field| field.param().to_string())
                    .unwrap_or_default(),
            ),
        };

        Self {
            key: chip.key(),
            label: chip.label(),
            action,
            value,
        }
    }
}

/// Everything the catalog templates render.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub loading: bool,
    pub error: Option<String>,
    pub products: Vec<ProductCard>,
    pub filtered_count: usize,
    pub total_count: usize,
    pub groups: Vec<FacetGroup>,
    pub inputs: NumericInputs,
    pub in_stock: bool,
    pub ratings: Vec<RatingOption>,
    pub chips: Vec<ChipView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub show_pagination: bool,
    pub pages: Vec<PageLink>,
    pub empty: bool,
    /// Catalog URL for the current state.
    pub url: String,
    /// Client-side debounce of the numeric inputs, in milliseconds.
    pub debounce_ms: u128,
}

impl CatalogPage {
    #[must_use]
    pub fn new(view: CatalogView, debounce: Duration) -> Self {
        let filters = &view.filters;
        let groups = vec![
            FacetGroup::new(
                "Categories",
                "toggle_category",
                view.facets.categories(),
                &filters.categories,
            ),
            FacetGroup::new(
                "Brands",
                "toggle_brand",
                view.facets.brands(),
                &filters.brands,
            ),
            FacetGroup::new("Tags", "toggle_tag", view.facets.tags(), &filters.tags),
        ]
        .into_iter()
        .filter(|group| !group.options.is_empty())
        .collect();

        let ratings = (1..=5u8)
            .map(|value| RatingOption {
                value,
                selected: filters.rating == Some(Decimal::from(value)),
            })
            .collect();

        let url = if view.query.is_empty() {
            "/catalog".to_string()
        } else {
            format!("/catalog?{}", view.query)
        };

        Self {
            empty: view.is_empty_result(),
            url,
            loading: view.loading,
            products: view.items.iter().map(ProductCard::from).collect(),
            filtered_count: view.filtered_count,
            total_count: view.total_count,
            groups,
            in_stock: filters.in_stock,
            ratings,
            chips: view.active_filters.iter().map(ChipView::from).collect(),
            current_page: view.current_page,
            total_pages: view.total_pages,
            show_pagination: view.show_pagination,
            error: view.error,
            inputs: view.inputs,
            pages: view.pages,
            debounce_ms: debounce.as_millis(),
        }
    }

    /// Whether any filter is active.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.chips.is_empty()
    }
}
