//! Mapping between [`Filters`] (plus a page number) and URL query parameters.
//!
//! Decoding is total: any string input produces a valid `Filters`. Unknown
//! list values are dropped, unparsable or out-of-range numbers are treated as
//! absent, and an inverted price range is swapped. Encoding emits only the
//! fields that differ from `Filters::default()`, so the default state maps to
//! an empty query string.
//!
//! # Example
//!
//! ```rust
//! use catalog_core::{Facets, QueryParams, decode, encode};
//!
//! let facets = Facets::new(vec!["A", "B", "C"], Vec::new(), Vec::new());
//! let params = QueryParams::parse("cat=A,D&min=50&max=10&rating=6");
//! let filters = decode(&params, &facets);
//!
//! assert_eq!(filters.categories, vec!["A".to_string()]);
//! assert_eq!(filters.min_price.map(|d| d.to_string()).as_deref(), Some("10"));
//! assert_eq!(filters.max_price.map(|d| d.to_string()).as_deref(), Some("50"));
//! assert_eq!(filters.rating.map(|d| d.to_string()).as_deref(), Some("5"));
//! assert_eq!(encode(&filters).to_query_string(), "cat=A&min=10&max=50&rating=5");
//! ```

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::facets::Facets;
use crate::filter::Filters;
use crate::query::{QueryParams, keys};

/// Raw values accepted as "on" for boolean parameters.
pub const TRUTHY_TOKENS: [&str; 4] = ["1", "true", "yes", "on"];

/// Value written for a boolean parameter that is on.
const FLAG_ON: &str = "1";

const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Read filters from query parameters, validating list values against `facets`.
#[must_use]
pub fn decode(params: &QueryParams, facets: &Facets) -> Filters {
    let (min_price, max_price) = order_price_range(
        parse_price(params.get(keys::MIN_PRICE)),
        parse_price(params.get(keys::MAX_PRICE)),
    );

    Filters {
        categories: decode_list(params.get(keys::CATEGORIES), |v| facets.has_category(v)),
        brands: decode_list(params.get(keys::BRANDS), |v| facets.has_brand(v)),
        tags: decode_list(params.get(keys::TAGS), |v| facets.has_tag(v)),
        min_price,
        max_price,
        min_discount: parse_discount(params.get(keys::MIN_DISCOUNT)),
        min_stock: parse_min_stock(params.get(keys::MIN_STOCK)),
        rating: parse_rating(params.get(keys::RATING)),
        in_stock: params.get(keys::IN_STOCK).is_some_and(is_truthy),
    }
}

/// Write filters into a fresh parameter set, skipping default fields.
///
/// The result never carries a page number.
#[must_use]
pub fn encode(filters: &Filters) -> QueryParams {
    let mut params = QueryParams::new();

    for (key, values) in [
        (keys::CATEGORIES, &filters.categories),
        (keys::BRANDS, &filters.brands),
        (keys::TAGS, &filters.tags),
    ] {
        if !values.is_empty() {
            params.set(key, encode_list(values));
        }
    }

    if let Some(min) = filters.min_price {
        params.set(keys::MIN_PRICE, min.to_string());
    }
    if let Some(max) = filters.max_price {
        params.set(keys::MAX_PRICE, max.to_string());
    }
    if let Some(discount) = filters.min_discount {
        params.set(keys::MIN_DISCOUNT, discount.to_string());
    }
    if let Some(stock) = filters.min_stock {
        params.set(keys::MIN_STOCK, stock.to_string());
    }
    if filters.in_stock {
        params.set(keys::IN_STOCK, FLAG_ON);
    }
    if let Some(rating) = filters.rating {
        params.set(keys::RATING, rating.to_string());
    }

    params
}

/// Read the page number. Anything but a positive integer means page 1.
#[must_use]
pub fn read_page(params: &QueryParams) -> u32 {
    params
        .get(keys::PAGE)
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Write the page number, omitting it for page 1 to keep URLs canonical.
pub fn write_page(params: &mut QueryParams, page: u32) {
    if page <= 1 {
        params.remove(keys::PAGE);
    } else {
        params.set(keys::PAGE, page.to_string());
    }
}

// =============================================================================
// Field Parsers
// =============================================================================

/// Parse a decimal number. Empty input and non-numbers yield `None`.
///
/// Surrounding whitespace is ignored and scientific notation is accepted.
/// The result is normalized (`"5.50"` becomes `5.5`, `"-0"` becomes `0`).
#[must_use]
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .map(|d| d.normalize())
}

/// Parse a price bound. Negative values are dropped.
#[must_use]
pub fn parse_price(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(parse_number).filter(|d| !d.is_sign_negative())
}

/// Parse a minimum discount. Values outside `0..=100` are dropped.
#[must_use]
pub fn parse_discount(raw: Option<&str>) -> Option<Decimal> {
    parse_price(raw).filter(|d| *d <= Decimal::ONE_HUNDRED)
}

/// Parse a minimum stock level. Only whole, non-negative numbers are kept.
#[must_use]
pub fn parse_min_stock(raw: Option<&str>) -> Option<u32> {
    parse_price(raw)
        .filter(|d| d.fract().is_zero())
        .and_then(|d| d.to_u32())
}

/// Parse a minimum rating, clamped into `0..=5`.
#[must_use]
pub fn parse_rating(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(parse_number).map(clamp_rating)
}

/// Clamp a rating into `0..=5`.
#[must_use]
pub fn clamp_rating(rating: Decimal) -> Decimal {
    rating.clamp(Decimal::ZERO, MAX_RATING)
}

/// Swap the bounds when both are present and inverted.
#[must_use]
pub fn order_price_range(
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> (Option<Decimal>, Option<Decimal>) {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
        other => other,
    }
}

/// Whether a raw boolean parameter is on.
#[must_use]
pub fn is_truthy(raw: &str) -> bool {
    TRUTHY_TOKENS.contains(&raw)
}

fn decode_list(raw: Option<&str>, known: impl Fn(&str) -> bool) -> Vec<String> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Vec::new();
    };
    raw.split(',')
        .filter_map(|part| urlencoding::decode(part).ok())
        .filter(|value| known(&**value))
        .map(Cow::into_owned)
        .collect()
}

fn encode_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| urlencoding::encode(v))
        .collect::<Vec<_>>()
        .join(",")
}
