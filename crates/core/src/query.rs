//! Query-string parameter container.
//!
//! `QueryParams` behaves like a browser's `URLSearchParams`: it keeps the
//! pairs in order, `get` answers with the first value of a key and `set`
//! replaces every value of a key. Parsing and serialization use
//! `application/x-www-form-urlencoded`, so values are percent-decoded once on
//! the way in and percent-encoded once on the way out.

use std::fmt;

use url::form_urlencoded;

/// Names of the query parameters making up the catalog's URL contract.
pub mod keys {
    pub const CATEGORIES: &str = "cat";
    pub const BRANDS: &str = "brand";
    pub const TAGS: &str = "tags";
    pub const MIN_PRICE: &str = "min";
    pub const MAX_PRICE: &str = "max";
    pub const MIN_DISCOUNT: &str = "discount";
    pub const MIN_STOCK: &str = "minStock";
    pub const RATING: &str = "rating";
    pub const IN_STOCK: &str = "stock";
    pub const PAGE: &str = "page";
}

/// Ordered key/value pairs of a URL query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parse a raw query string. A leading `?` is ignored.
    ///
    /// Parsing never fails; malformed escapes are decoded lossily.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Replace every value of `key` with a single `value`.
    ///
    /// The new pair takes the position of the first existing one, or is
    /// appended when the key was absent.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let mut value = Some(value.into());
        self.pairs.retain_mut(|(k, v)| {
            if k.as_str() != key {
                return true;
            }
            match value.take() {
                Some(new) => {
                    *v = new;
                    true
                }
                None => false,
            }
        });
        if let Some(value) = value {
            self.pairs.push((key.to_string(), value));
        }
    }

    /// Append a pair without touching existing values of the same key.
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    /// Remove every value of `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as `application/x-www-form-urlencoded`, without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Serialize with a leading `?`, or an empty string when there are no pairs.
    #[must_use]
    pub fn to_search(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("?{}", self.to_query_string())
        }
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
