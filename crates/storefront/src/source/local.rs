//! Deterministic local product dataset.

use catalog_core::{Product, ProductId, ProductSource, SourceError};
use rust_decimal::Decimal;

/// Categories of the local dataset, assigned round-robin.
pub const LOCAL_CATEGORIES: [&str; 8] = [
    "Electronics",
    "Clothing",
    "Books",
    "Home",
    "Beauty",
    "Sports",
    "Toys",
    "Grocery",
];

/// Number of products in the local dataset.
pub const LOCAL_PRODUCT_COUNT: u32 = 200;

const BRANDS: [&str; 7] = [
    "Acme", "Globex", "Initech", "Umbrella", "Hooli", "Stark", "Wayne",
];

const TAGS: [&str; 6] = ["new", "sale", "popular", "eco", "limited", "gift"];

/// Generates the same catalog on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSource {
    count: u32,
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new(LOCAL_PRODUCT_COUNT)
    }
}

impl LocalSource {
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self { count }
    }

    /// Build the dataset.
    ///
    /// For product `i` (1-based): price is `5 + ((i - 1) % 50) * 2`, rating
    /// cycles through 1..=5 and every fourth product is out of stock.
    #[must_use]
    pub fn generate(&self) -> Vec<Product> {
        (1..=self.count).map(product).collect()
    }
}

impl ProductSource for LocalSource {
    async fn load_products(&self) -> Result<Vec<Product>, SourceError> {
        Ok(self.generate())
    }
}

#[allow(clippy::indexing_slicing)]
fn product(i: u32) -> Product {
    let n = i as usize - 1;
    let category = LOCAL_CATEGORIES[n % LOCAL_CATEGORIES.len()];
    let brand = BRANDS[n % BRANDS.len()];

    let mut tags = vec![TAGS[n % TAGS.len()].to_string()];
    let second = TAGS[(n / TAGS.len()) % TAGS.len()];
    if tags[0] != second {
        tags.push(second.to_string());
    }

    let stock = if i % 4 == 0 { 0 } else { (i * 13) % 50 + 1 };

    Product {
        id: ProductId::new(i),
        title: format!("{category} Product {i}"),
        description: format!("A {} item from {brand}.", category.to_lowercase()),
        category: category.to_string(),
        price: Decimal::from(5 + (n % 50) * 2),
        discount_percentage: Decimal::from((i * 7) % 30),
        rating: Decimal::from(n % 5 + 1),
        stock,
        tags,
        brand: Some(brand.to_string()),
        thumbnail: None,
        images: Vec::new(),
        sku: Some(format!("LOC-{i:04}")),
        weight: Some(Decimal::from(i % 10 + 1)),
        availability_status: Some(if stock > 0 { "In Stock" } else { "Out of Stock" }.to_string()),
    }
}
