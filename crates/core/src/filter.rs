//! The filter value object and the predicate it defines over products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Product;

/// The normalized set of constraints a user has chosen.
///
/// A `None`, empty or `false` field means the constraint is disabled.
/// `Filters::default()` is the "no constraints" state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub tags: Vec<String>,
    /// Lower price bound. Never greater than `max_price` when both are set.
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Minimum discount in percent, within `0..=100`.
    pub min_discount: Option<Decimal>,
    pub min_stock: Option<u32>,
    /// Minimum rating, within `0..=5`.
    pub rating: Option<Decimal>,
    pub in_stock: bool,
}

impl Filters {
    /// Whether no constraint is active.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Number of active constraints, counting each list value separately.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let scalars = [
            self.min_price.is_some(),
            self.max_price.is_some(),
            self.min_discount.is_some(),
            self.min_stock.is_some(),
            self.rating.is_some(),
            self.in_stock,
        ];
        self.categories.len()
            + self.brands.len()
            + self.tags.len()
            + scalars.iter().filter(|active| **active).count()
    }
}

/// Test one product against every active constraint.
#[must_use]
pub fn matches(product: &Product, filters: &Filters) -> bool {
    if !filters.categories.is_empty() && !filters.categories.contains(&product.category) {
        return false;
    }

    if !filters.brands.is_empty() {
        match &product.brand {
            Some(brand) if filters.brands.contains(brand) => {}
            _ => return false,
        }
    }

    if !filters.tags.is_empty() && !filters.tags.iter().any(|tag| product.has_tag(tag)) {
        return false;
    }

    if filters.in_stock && !product.in_stock() {
        return false;
    }

    if filters.min_price.is_some_and(|min| product.price < min) {
        return false;
    }
    if filters.max_price.is_some_and(|max| product.price > max) {
        return false;
    }

    if filters
        .min_discount
        .is_some_and(|min| product.discount_percentage < min)
    {
        return false;
    }

    if filters.min_stock.is_some_and(|min| product.stock < min) {
        return false;
    }

    !filters.rating.is_some_and(|min| product.rating < min)
}

/// Keep the products matching `filters`, in their original order.
#[must_use]
pub fn apply_filters(products: &[Product], filters: &Filters) -> Vec<Product> {
    products
        .iter()
        .filter(|p| matches(p, filters))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::product::fixtures::product;

    fn items() -> Vec<Product> {
        let mut alpha = product(1, "A", 10);
        alpha.rating = Decimal::from(4);
        let mut bravo = product(2, "B", 20);
        bravo.rating = Decimal::from(3);
        bravo.stock = 0;
        let mut charlie = product(3, "A", 30);
        charlie.rating = Decimal::from(5);
        vec![alpha, bravo, charlie]
    }

    fn ids(products: &[Product]) -> Vec<u32> {
        products.iter().map(|p| p.id.as_u32()).collect()
    }

    #[test]
    fn test_filters_by_category() {
        let filters = Filters {
            categories: vec!["A".to_string()],
            ..Filters::default()
        };
        assert_eq!(ids(&apply_filters(&items(), &filters)), vec![1, 3]);
    }

    #[test]
    fn test_filters_by_price_range() {
        let filters = Filters {
            min_price: Some(Decimal::from(15)),
            max_price: Some(Decimal::from(25)),
            ..Filters::default()
        };
        assert_eq!(ids(&apply_filters(&items(), &filters)), vec![2]);
    }

    #[test]
    fn test_filters_by_stock_and_rating() {
        let filters = Filters {
            in_stock: true,
            rating: Some(Decimal::from(4)),
            ..Filters::default()
        };
        assert_eq!(ids(&apply_filters(&items(), &filters)), vec![1, 3]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filters = Filters {
            min_price: Some(Decimal::from(10)),
            max_price: Some(Decimal::from(30)),
            ..Filters::default()
        };
        assert_eq!(ids(&apply_filters(&items(), &filters)), vec![1, 2, 3]);
    }

    #[test]
    fn test_brand_filter_excludes_products_without_brand() {
        let mut products = items();
        products[0].brand = Some("Acme".to_string());
        let filters = Filters {
            brands: vec!["Acme".to_string()],
            ..Filters::default()
        };
        assert_eq!(ids(&apply_filters(&products, &filters)), vec![1]);
    }

    #[test]
    fn test_tag_filter_needs_one_common_tag() {
        let mut products = items();
        products[0].tags = vec!["red".to_string(), "sale".to_string()];
        products[1].tags = vec!["blue".to_string()];
        let filters = Filters {
            tags: vec!["sale".to_string(), "green".to_string()],
            ..Filters::default()
        };
        assert_eq!(ids(&apply_filters(&products, &filters)), vec![1]);
    }

    #[test]
    fn test_discount_and_min_stock() {
        let mut products = items();
        products[0].discount_percentage = Decimal::from(20);
        products[0].stock = 2;
        products[2].discount_percentage = Decimal::from(25);
        products[2].stock = 8;

        let filters = Filters {
            min_discount: Some(Decimal::from(20)),
            min_stock: Some(5),
            ..Filters::default()
        };
        assert_eq!(ids(&apply_filters(&products, &filters)), vec![3]);
    }

    #[test]
    fn test_default_filters_keep_everything() {
        assert_eq!(ids(&apply_filters(&items(), &Filters::default())), vec![1, 2, 3]);
    }

    #[test]
    fn test_active_count() {
        let filters = Filters {
            categories: vec!["A".to_string(), "B".to_string()],
            rating: Some(Decimal::from(2)),
            in_stock: true,
            ..Filters::default()
        };
        assert_eq!(filters.active_count(), 4);
        assert!(!filters.is_default());
        assert!(Filters::default().is_default());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_product() -> impl Strategy<Value = Product> {
            (
                1u32..500,
                prop::sample::select(vec!["A", "B", "C"]),
                0i64..200,
                0u32..20,
                0i64..=5,
                prop::option::of(prop::sample::select(vec!["X", "Y"])),
            )
                .prop_map(|(id, category, price, stock, rating, brand)| {
                    let mut p = product(id, category, price);
                    p.stock = stock;
                    p.rating = Decimal::from(rating);
                    p.brand = brand.map(str::to_string);
                    p
                })
        }

        fn arb_filters() -> impl Strategy<Value = Filters> {
            (
                prop::collection::vec(prop::sample::select(vec!["A", "B", "C"]), 0..3),
                prop::collection::vec(prop::sample::select(vec!["X", "Y"]), 0..2),
                prop::option::of(0i64..200),
                prop::option::of(0i64..200),
                prop::option::of(0u32..20),
                prop::option::of(0i64..=5),
                any::<bool>(),
            )
                .prop_map(|(cats, brands, min, max, min_stock, rating, in_stock)| Filters {
                    categories: cats.into_iter().map(str::to_string).collect(),
                    brands: brands.into_iter().map(str::to_string).collect(),
                    min_price: min.map(Decimal::from),
                    max_price: max.map(Decimal::from),
                    min_stock,
                    rating: rating.map(Decimal::from),
                    in_stock,
                    ..Filters::default()
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: the result is an order-preserving subsequence of matching products.
            #[test]
            fn result_is_ordered_subsequence(
                products in prop::collection::vec(arb_product(), 0..40),
                filters in arb_filters(),
            ) {
                let result = apply_filters(&products, &filters);

                let mut cursor = products.iter();
                for kept in &result {
                    prop_assert!(cursor.any(|p| p == kept));
                    prop_assert!(matches(kept, &filters));
                }

                let expected = products.iter().filter(|p| matches(p, &filters)).count();
                prop_assert_eq!(result.len(), expected);
            }
        }
    }
}
