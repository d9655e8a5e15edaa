//! End-to-end catalog session flows over the local dataset.
//!
//! These drive a [`CatalogSession`] with an in-memory history the way a
//! browser tab would: edits, back/forward navigation, debounced typing.

#![allow(clippy::unwrap_used)]

use catalog_core::{
    ActiveFilter, CatalogSession, InMemoryHistory, Navigation, NavigationKind, NumericField,
    SessionOptions,
};
use catalog_storefront::source::LocalSource;
use rust_decimal::Decimal;

async fn session(query: &str) -> CatalogSession<InMemoryHistory> {
    let mut session = CatalogSession::new(
        InMemoryHistory::from_query(query),
        SessionOptions::default(),
    );
    session.load(&LocalSource::default()).await;
    session
}

#[tokio::test]
async fn test_deep_link_restores_filters_and_page() {
    let mut session = session("cat=Books&stock=1&page=2").await;
    let view = session.view();

    assert_eq!(view.current_page, 2);
    assert!(view.filters.in_stock);
    assert_eq!(view.filters.categories, vec!["Books"]);
    assert!(view.items.iter().all(|p| p.category == "Books" && p.in_stock()));
    assert_eq!(
        view.active_filters,
        vec![ActiveFilter::Category("Books".to_string()), ActiveFilter::InStock]
    );
}

#[tokio::test]
async fn test_back_restores_previous_filters() {
    let mut session = session("").await;

    session.toggle_category("Books");
    session.toggle_brand("Acme");
    assert_eq!(session.filters().brands, vec!["Acme"]);

    assert!(session.navigation_mut().back());
    let filters = session.on_navigation();
    assert_eq!(filters.categories, vec!["Books"]);
    assert!(filters.brands.is_empty());

    assert!(session.navigation_mut().forward());
    assert_eq!(session.on_navigation().brands, vec!["Acme"]);
}

#[tokio::test]
async fn test_filter_change_returns_to_first_page() {
    let mut session = session("page=5").await;
    assert_eq!(session.view().current_page, 5);

    session.toggle_tag("sale");
    let view = session.view();
    assert_eq!(view.current_page, 1);
    assert!(!session.navigation().location().contains("page"));
}

#[tokio::test]
async fn test_page_clamped_after_narrowing() {
    let mut session = session("page=10").await;
    session.navigation_mut().replace(
        catalog_core::QueryParams::parse("cat=Books&page=10"),
    );
    session.on_navigation();

    let view = session.view();
    assert_eq!(view.current_page, 1);
    assert_eq!(session.navigation().last_change(), Some(NavigationKind::Replace));
    assert_eq!(view.query, "cat=Books");
}

#[tokio::test(start_paused = true)]
async fn test_typing_settles_into_one_replace() {
    let mut session = session("cat=Books").await;
    let entries = session.navigation().len();

    session.set_input(NumericField::MinPrice, "2");
    session.set_input(NumericField::MinPrice, "20");
    assert!(session.settle().await);

    assert_eq!(session.navigation().len(), entries);
    assert_eq!(session.navigation().last_change(), Some(NavigationKind::Replace));
    assert_eq!(session.navigation().location().to_query_string(), "cat=Books&min=20");

    let view = session.view();
    assert!(view.items.iter().all(|p| p.price >= Decimal::from(20)));
}

#[tokio::test]
async fn test_remove_chip_and_reset() {
    let mut session = session("cat=Books,Home&rating=3&stock=1").await;

    session.remove(&ActiveFilter::Category("Home".to_string()));
    assert_eq!(session.filters().categories, vec!["Books"]);

    session.remove(&ActiveFilter::InStock);
    assert!(!session.filters().in_stock);

    session.reset();
    assert!(session.filters().is_default());
    assert_eq!(session.view().filtered_count, 200);
}
