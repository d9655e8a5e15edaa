//! Product records as loaded from a product source.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A single item in the catalog.
///
/// Products are immutable once loaded. A reload replaces the whole collection
/// rather than editing records in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Unit price, never negative.
    pub price: Decimal,
    /// Discount in percent, within `0..=100`.
    pub discount_percentage: Decimal,
    /// Average review score, within `0..=5`.
    pub rating: Decimal,
    pub stock: u32,
    pub tags: Vec<String>,
    pub brand: Option<String>,

    // Display-only fields
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
    pub sku: Option<String>,
    pub weight: Option<Decimal>,
    pub availability_status: Option<String>,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Price after applying the discount, rounded to cents.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        let factor = (Decimal::ONE_HUNDRED - self.discount_percentage) / Decimal::ONE_HUNDRED;
        (self.price * factor).round_dp(2)
    }

    /// Whether the product carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a product with sensible defaults for tests.
    pub fn product(id: u32, category: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            category: category.to_string(),
            price: Decimal::from(price),
            discount_percentage: Decimal::ZERO,
            rating: Decimal::from(3),
            stock: 10,
            tags: Vec::new(),
            brand: None,
            thumbnail: None,
            images: Vec::new(),
            sku: None,
            weight: None,
            availability_status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;

    #[test]
    fn test_in_stock_derived_from_stock() {
        let mut p = product(1, "A", 10);
        assert!(p.in_stock());
        p.stock = 0;
        assert!(!p.in_stock());
    }

    #[test]
    fn test_discounted_price() {
        let mut p = product(1, "A", 200);
        p.discount_percentage = Decimal::from(15);
        assert_eq!(p.discounted_price(), Decimal::from(170));
    }

    #[test]
    fn test_has_tag_is_exact() {
        let mut p = product(1, "A", 10);
        p.tags = vec!["beauty".to_string()];
        assert!(p.has_tag("beauty"));
        assert!(!p.has_tag("Beauty"));
    }
}
