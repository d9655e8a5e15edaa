//! Distinct filterable values of a product collection.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::Product;

/// Categories, brands and tags present in a loaded collection.
///
/// Each list is de-duplicated, case-sensitive and sorted, so it can be used
/// both for rendering choices and for validating values read from the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    categories: Vec<String>,
    brands: Vec<String>,
    tags: Vec<String>,
}

impl Facets {
    /// Derive facets from a product collection.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let categories: BTreeSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
        let brands: BTreeSet<&str> = products.iter().filter_map(|p| p.brand.as_deref()).collect();
        let tags: BTreeSet<&str> = products
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .collect();

        Self {
            categories: categories.into_iter().map(str::to_string).collect(),
            brands: brands.into_iter().map(str::to_string).collect(),
            tags: tags.into_iter().map(str::to_string).collect(),
        }
    }

    /// Build facets from explicit lists. Values are sorted and de-duplicated.
    #[must_use]
    pub fn new<I, S>(categories: I, brands: I, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fn normalize<I: IntoIterator<Item = S>, S: Into<String>>(values: I) -> Vec<String> {
            values
                .into_iter()
                .map(Into::into)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }

        Self {
            categories: normalize(categories),
            brands: normalize(brands),
            tags: normalize(tags),
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn has_category(&self, value: &str) -> bool {
        contains(&self.categories, value)
    }

    #[must_use]
    pub fn has_brand(&self, value: &str) -> bool {
        contains(&self.brands, value)
    }

    #[must_use]
    pub fn has_tag(&self, value: &str) -> bool {
        contains(&self.tags, value)
    }
}

fn contains(sorted: &[String], value: &str) -> bool {
    sorted
        .binary_search_by(|probe| probe.as_str().cmp(value))
        .is_ok()
}
