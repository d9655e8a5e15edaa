//! HTMX request and response plumbing.
//!
//! The browser address bar is the catalog's navigation store. On the server a
//! request sees it through [`HtmxNavigation`]: the location comes from the
//! `HX-Current-URL` header (or the request query), and the push/replace the
//! catalog performs is sent back as `HX-Push-Url` / `HX-Replace-Url`.

use axum::http::HeaderMap;
use catalog_core::{Navigation, NavigationKind, QueryParams};
use url::Url;

pub const HX_REQUEST: &str = "HX-Request";
pub const HX_HISTORY_RESTORE_REQUEST: &str = "HX-History-Restore-Request";
pub const HX_CURRENT_URL: &str = "HX-Current-URL";
pub const HX_PUSH_URL: &str = "HX-Push-Url";
pub const HX_REPLACE_URL: &str = "HX-Replace-Url";
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Client-side event asking the page to scroll smoothly to the top.
pub const SCROLL_TO_TOP_EVENT: &str = "catalog:scroll-top";

/// Whether the request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// Whether HTMX is re-fetching a page missing from its history cache.
///
/// Such a response replaces the whole `<body>`, so it must be a full page.
#[must_use]
pub fn is_history_restore(headers: &HeaderMap) -> bool {
    headers
        .get(HX_HISTORY_RESTORE_REQUEST)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// Query parameters of the page the HTMX request was issued from.
#[must_use]
pub fn current_location(headers: &HeaderMap) -> QueryParams {
    headers
        .get(HX_CURRENT_URL)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| Url::parse(raw).ok())
        .map(|url| QueryParams::parse(url.query().unwrap_or_default()))
        .unwrap_or_default()
}

/// Navigation store for the duration of one request.
#[derive(Debug, Clone)]
pub struct HtmxNavigation {
    path: &'static str,
    location: QueryParams,
    change: Option<NavigationKind>,
}

impl HtmxNavigation {
    /// Start at `location` on the page served at `path`.
    #[must_use]
    pub const fn new(path: &'static str, location: QueryParams) -> Self {
        Self {
            path,
            location,
            change: None,
        }
    }

    /// Net effect on browser history.
    ///
    /// A push followed by replaces is still a single push of the final URL.
    #[must_use]
    pub const fn change(&self) -> Option<NavigationKind> {
        self.change
    }

    /// URL of the current location.
    #[must_use]
    pub fn url(&self) -> String {
        let search = self.location.to_search();
        format!("{}{search}", self.path)
    }

    /// History header to send back, if the location changed.
    #[must_use]
    pub fn history_header(&self) -> Option<(&'static str, String)> {
        let name = match self.change? {
            NavigationKind::Push => HX_PUSH_URL,
            NavigationKind::Replace => HX_REPLACE_URL,
        };
        Some((name, self.url()))
    }

    fn record(&mut self, kind: NavigationKind) {
        if self.change != Some(NavigationKind::Push) {
            self.change = Some(kind);
        }
    }
}

impl Navigation for HtmxNavigation {
    fn location(&self) -> &QueryParams {
        &self.location
    }

    fn push(&mut self, params: QueryParams) {
        self.location = params;
        self.record(NavigationKind::Push);
    }

    fn replace(&mut self, params: QueryParams) {
        self.location = params;
        self.record(NavigationKind::Replace);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderName, HeaderValue};

    use super::*;

    #[test]
    fn test_current_location_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("hx-current-url"),
            HeaderValue::from_static("http://localhost:3000/catalog?cat=Books&page=2"),
        );
        let location = current_location(&headers);
        assert_eq!(location.get("cat"), Some("Books"));
        assert_eq!(location.get("page"), Some("2"));
    }

    #[test]
    fn test_missing_header_is_empty_location() {
        assert!(current_location(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HeaderName::from_static("hx-request"), HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
        assert!(!is_history_restore(&headers));
        headers.insert(
            HeaderName::from_static("hx-history-restore-request"),
            HeaderValue::from_static("true"),
        );
        assert!(is_history_restore(&headers));
    }

    #[test]
    fn test_push_then_replace_is_push() {
        let mut nav = HtmxNavigation::new("/catalog", QueryParams::new());
        nav.push(QueryParams::parse("cat=A&page=4"));
        nav.replace(QueryParams::parse("cat=A"));

        assert_eq!(nav.change(), Some(NavigationKind::Push));
        assert_eq!(
            nav.history_header(),
            Some((HX_PUSH_URL, "/catalog?cat=A".to_string()))
        );
    }

    #[test]
    fn test_replace_only() {
        let mut nav = HtmxNavigation::new("/catalog", QueryParams::parse("min=5"));
        nav.replace(QueryParams::new());
        assert_eq!(nav.history_header(), Some((HX_REPLACE_URL, "/catalog".to_string())));
    }

    #[test]
    fn test_untouched_sends_nothing() {
        let nav = HtmxNavigation::new("/catalog", QueryParams::parse("cat=A"));
        assert_eq!(nav.history_header(), None);
        assert_eq!(nav.url(), "/catalog?cat=A");
    }
}
