//! Client-side pagination over the filtered collection.
//!
//! The current page lives in the `page` query parameter. A page number beyond
//! the last page (say after a filter change shrank the result) is corrected to
//! page 1 with a replace, so the bad URL does not stay in history.

use serde::Serialize;
use tracing::debug;

use crate::codec::{read_page, write_page};
use crate::navigation::Navigation;
use crate::query::QueryParams;

/// Products shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Outcome of a page change requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageChange {
    pub page: u32,
    /// The viewport should smoothly scroll back to the top.
    pub scroll_to_top: bool,
}

/// One entry of the page selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: u32,
    /// Query string (without `?`) leading to this page.
    pub query: String,
    pub current: bool,
}

/// Computes pages and keeps the `page` parameter valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationController {
    page_size: usize,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationController {
    /// A page size of zero is treated as one.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(count / page_size)`; zero for an empty collection.
    #[must_use]
    pub fn total_pages(&self, count: usize) -> u32 {
        u32::try_from(count.div_ceil(self.page_size)).unwrap_or(u32::MAX)
    }

    /// Page number in the location, defaulting to 1.
    #[must_use]
    pub fn current_page<N: Navigation + ?Sized>(&self, nav: &N) -> u32 {
        read_page(nav.location())
    }

    /// Whether a selector should be shown.
    #[must_use]
    pub const fn is_paginated(total_pages: u32) -> bool {
        total_pages > 1
    }

    /// Items of the 1-based `page`. Out-of-range pages yield an empty slice.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T], page: u32) -> &'a [T] {
        let index = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);
        let start = index.saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        items.get(start..end).unwrap_or_default()
    }

    /// Bring the location's page in range for `count` filtered items.
    ///
    /// A page beyond the last one is rewritten to page 1 with a replace. An
    /// empty collection shows page 1 without touching the location. Returns
    /// the page to display.
    pub fn reconcile<N: Navigation + ?Sized>(&self, nav: &mut N, count: usize) -> u32 {
        let total = self.total_pages(count);
        let current = self.current_page(nav);

        if total == 0 {
            return 1;
        }
        if current > total {
            debug!(current, total, "Page out of range, returning to page 1");
            let mut params = nav.location().clone();
            write_page(&mut params, 1);
            nav.replace(params);
            return 1;
        }
        current
    }

    /// Navigate to `page`, adding a history entry.
    ///
    /// Other parameters are preserved. Page 1 is written by omitting the
    /// parameter.
    pub fn go_to<N: Navigation + ?Sized>(&self, nav: &mut N, page: u32) -> PageChange {
        let page = page.max(1);
        let mut params = nav.location().clone();
        write_page(&mut params, page);
        nav.push(params);

        PageChange {
            page,
            scroll_to_top: true,
        }
    }

    /// Selector entries for pages `1..=total_pages` based on `params`.
    #[must_use]
    pub fn page_links(params: &QueryParams, current: u32, total_pages: u32) -> Vec<PageLink> {
        (1..=total_pages)
            .map(|number| {
                let mut target = params.clone();
                write_page(&mut target, number);
                PageLink {
                    number,
                    query: target.to_query_string(),
                    current: number == current,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{InMemoryHistory, NavigationKind};
    use crate::query::keys;

    #[test]
    fn test_total_pages() {
        let pager = PaginationController::new(12);
        assert_eq!(pager.total_pages(0), 0);
        assert_eq!(pager.total_pages(1), 1);
        assert_eq!(pager.total_pages(12), 1);
        assert_eq!(pager.total_pages(13), 2);
        assert_eq!(pager.total_pages(25), 3);
    }

    #[test]
    fn test_zero_page_size_is_one() {
        assert_eq!(PaginationController::new(0).page_size(), 1);
    }

    #[test]
    fn test_slice() {
        let pager = PaginationController::new(12);
        let items: Vec<u32> = (1..=25).collect();

        assert_eq!(pager.slice(&items, 1), &items[0..12]);
        assert_eq!(pager.slice(&items, 3), &[25]);
        assert!(pager.slice(&items, 4).is_empty());
        assert!(pager.slice::<u32>(&[], 1).is_empty());
    }

    #[test]
    fn test_reconcile_corrects_overflow_with_replace() {
        let pager = PaginationController::new(12);
        let mut history = InMemoryHistory::from_query("cat=A&page=5");

        assert_eq!(pager.reconcile(&mut history, 25), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.last_change(), Some(NavigationKind::Replace));
        assert_eq!(history.location().to_query_string(), "cat=A");
    }

    #[test]
    fn test_reconcile_keeps_valid_page() {
        let pager = PaginationController::new(12);
        let mut history = InMemoryHistory::from_query("page=3");
        assert_eq!(pager.reconcile(&mut history, 25), 3);
        assert_eq!(history.last_change(), None);
    }

    #[test]
    fn test_reconcile_empty_collection_leaves_location() {
        let pager = PaginationController::new(12);
        let mut history = InMemoryHistory::from_query("page=4");
        assert_eq!(pager.reconcile(&mut history, 0), 1);
        assert_eq!(history.location().get(keys::PAGE), Some("4"));
    }

    #[test]
    fn test_go_to_pushes_and_preserves_filters() {
        let pager = PaginationController::default();
        let mut history = InMemoryHistory::from_query("cat=A");

        let change = pager.go_to(&mut history, 2);
        assert_eq!(change, PageChange { page: 2, scroll_to_top: true });
        assert_eq!(history.len(), 2);
        assert_eq!(history.location().to_query_string(), "cat=A&page=2");

        pager.go_to(&mut history, 1);
        assert_eq!(history.location().to_query_string(), "cat=A");
    }

    #[test]
    fn test_page_links() {
        let params = QueryParams::parse("cat=A&page=2");
        let links = PaginationController::page_links(&params, 2, 3);

        let queries: Vec<&str> = links.iter().map(|l| l.query.as_str()).collect();
        assert_eq!(queries, vec!["cat=A", "cat=A&page=2", "cat=A&page=3"]);
        assert!(links[1].current);
        assert!(!links[0].current);
    }

    #[test]
    fn test_single_page_not_paginated() {
        assert!(!PaginationController::is_paginated(0));
        assert!(!PaginationController::is_paginated(1));
        assert!(PaginationController::is_paginated(2));
    }
}
