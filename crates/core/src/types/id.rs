//! Product identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a product in the catalog feed.
///
/// Wraps the feed's integer id so it cannot be confused with a stock count or
/// a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ProductId> for u32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_conversions() {
        let id = ProductId::from(42);
        assert_eq!(u32::from(id), 42);
        assert_eq!(id.as_u32(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_product_id_serializes_transparently() {
        let json = serde_json::to_string(&ProductId::new(9)).unwrap_or_default();
        assert_eq!(json, "9");
        let id: Option<ProductId> = serde_json::from_str("17").ok();
        assert_eq!(id, Some(ProductId::new(17)));
    }
}
