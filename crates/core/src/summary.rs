//! Chip summary of the active filters.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::filter::Filters;
use crate::sync::NumericField;

/// One active constraint, shown as a removable chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ActiveFilter {
    Category(String),
    Brand(String),
    Tag(String),
    MinPrice(Decimal),
    MaxPrice(Decimal),
    MinDiscount(Decimal),
    MinStock(u32),
    Rating(Decimal),
    InStock,
}

impl ActiveFilter {
    /// Human-readable chip label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Category(value) | Self::Brand(value) | Self::Tag(value) => value.clone(),
            Self::MinPrice(value) => format!("Min: ${value}"),
            Self::MaxPrice(value) => format!("Max: ${value}"),
            Self::MinDiscount(value) => format!("Discount \u{2265} {value}%"),
            Self::MinStock(value) => format!("Stock \u{2265} {value}"),
            Self::Rating(value) => format!("Rating \u{2265} {value}"),
            Self::InStock => "In Stock".to_string(),
        }
    }

    /// Stable identifier, unique within one summary.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Category(value) => format!("cat-{value}"),
            Self::Brand(value) => format!("brand-{value}"),
            Self::Tag(value) => format!("tag-{value}"),
            Self::MinPrice(_) => "min-price".to_string(),
            Self::MaxPrice(_) => "max-price".to_string(),
            Self::MinDiscount(_) => "min-discount".to_string(),
            Self::MinStock(_) => "min-stock".to_string(),
            Self::Rating(_) => "rating".to_string(),
            Self::InStock => "in-stock".to_string(),
        }
    }

    /// The numeric text input behind this chip, if any.
    #[must_use]
    pub const fn numeric_field(&self) -> Option<NumericField> {
        match self {
            Self::MinPrice(_) => Some(NumericField::MinPrice),
            Self::MaxPrice(_) => Some(NumericField::MaxPrice),
            Self::MinDiscount(_) => Some(NumericField::MinDiscount),
            Self::MinStock(_) => Some(NumericField::MinStock),
            _ => None,
        }
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// List the active filters in display order.
#[must_use]
pub fn active_filters(filters: &Filters) -> Vec<ActiveFilter> {
    let mut chips = Vec::with_capacity(filters.active_count());

    chips.extend(filters.categories.iter().cloned().map(ActiveFilter::Category));
    chips.extend(filters.brands.iter().cloned().map(ActiveFilter::Brand));
    chips.extend(filters.tags.iter().cloned().map(ActiveFilter::Tag));
    chips.extend(filters.min_price.map(ActiveFilter::MinPrice));
    chips.extend(filters.max_price.map(ActiveFilter::MaxPrice));
    chips.extend(filters.min_discount.map(ActiveFilter::MinDiscount));
    chips.extend(filters.min_stock.map(ActiveFilter::MinStock));
    chips.extend(filters.rating.map(ActiveFilter::Rating));
    if filters.in_stock {
        chips.push(ActiveFilter::InStock);
    }

    chips
}
