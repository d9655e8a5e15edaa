//! The URL query string as a navigable key-value store.
//!
//! Filter and page state live in the location rather than in private memory,
//! so every change can be revisited with back/forward navigation. Controllers
//! receive the store explicitly through the [`Navigation`] trait.

use crate::query::QueryParams;

/// A location with push/replace history semantics.
pub trait Navigation {
    /// Query parameters of the current entry.
    fn location(&self) -> &QueryParams;

    /// Add a new history entry and make it current.
    fn push(&mut self, params: QueryParams);

    /// Overwrite the current entry without adding history.
    fn replace(&mut self, params: QueryParams);
}

/// How the last change reached the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Push,
    Replace,
}

/// Browser-like history kept in memory.
///
/// Pushing discards any forward entries, like a browser does after going back.
#[derive(Debug, Clone)]
pub struct InMemoryHistory {
    entries: Vec<QueryParams>,
    cursor: usize,
    last: Option<NavigationKind>,
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(QueryParams::new())
    }
}

impl InMemoryHistory {
    /// Start a history with a single entry.
    #[must_use]
    pub fn new(initial: QueryParams) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            last: None,
        }
    }

    /// Start a history from a raw query string.
    #[must_use]
    pub fn from_query(raw: &str) -> Self {
        Self::new(QueryParams::parse(raw))
    }

    /// Go one entry back. Returns `false` at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.last = None;
        true
    }

    /// Go one entry forward. Returns `false` at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        self.last = None;
        true
    }

    /// Number of entries in the history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How the current entry was last written, if it was written at all
    /// since the last back/forward move.
    #[must_use]
    pub const fn last_change(&self) -> Option<NavigationKind> {
        self.last
    }
}

impl Navigation for InMemoryHistory {
    #[allow(clippy::indexing_slicing)]
    fn location(&self) -> &QueryParams {
        // `entries` is never empty and `cursor` always indexes it
        &self.entries[self.cursor]
    }

    fn push(&mut self, params: QueryParams) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(params);
        self.cursor = self.entries.len() - 1;
        self.last = Some(NavigationKind::Push);
    }

    #[allow(clippy::indexing_slicing)]
    fn replace(&mut self, params: QueryParams) {
        self.entries[self.cursor] = params;
        self.last = Some(NavigationKind::Replace);
    }
}
