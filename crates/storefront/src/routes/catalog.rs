//! Catalog route handlers.
//!
//! Every request decodes the catalog state from the URL. Filter and page
//! actions are HTMX posts: they read the page URL from `HX-Current-URL`, run
//! the action against a fresh session and answer with the re-rendered results
//! plus the history header for the new URL.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{RawQuery, State},
    http::{HeaderMap, Uri},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use catalog_core::codec::{is_truthy, parse_rating};
use catalog_core::{
    CatalogSession, CatalogView, Navigation, NumericField, NumericInputs, QueryParams,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::htmx::{
    HX_TRIGGER, HtmxNavigation, SCROLL_TO_TOP_EVENT, current_location, is_history_restore, is_htmx,
};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::views::CatalogPage;

/// Path the catalog is served at.
pub const CATALOG_PATH: &str = "/catalog";

/// Full catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub page: CatalogPage,
}

/// Catalog results fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "catalog/results.html")]
pub struct CatalogResultsTemplate {
    pub page: CatalogPage,
}

// =============================================================================
// Actions
// =============================================================================

/// Filter action form data.
///
/// Numeric inputs use their query parameter names so the same form also works
/// as a plain GET.
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    pub action: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub min: String,
    #[serde(default)]
    pub max: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default, rename = "minStock")]
    pub min_stock: String,
}

/// One user interaction with the filters panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    ToggleCategory(String),
    ToggleBrand(String),
    ToggleTag(String),
    SetInStock(bool),
    SetRating(Option<Decimal>),
    /// Commit the numeric inputs once typing paused.
    Inputs(NumericInputs),
    /// Clear one numeric input.
    Clear(NumericField),
    Reset,
}

impl TryFrom<FilterForm> for FilterAction {
    type Error = AppError;

    fn try_from(form: FilterForm) -> Result<Self> {
        let action = match form.action.as_str() {
            "toggle_category" => Self::ToggleCategory(form.value),
            "toggle_brand" => Self::ToggleBrand(form.value),
            "toggle_tag" => Self::ToggleTag(form.value),
            "set_in_stock" => Self::SetInStock(is_truthy(&form.value)),
            "set_rating" => Self::SetRating(parse_rating(Some(&form.value))),
            "inputs" => Self::Inputs(NumericInputs {
                min_price: form.min,
                max_price: form.max,
                min_discount: form.discount,
                min_stock: form.min_stock,
            }),
            "clear" => Self::Clear(NumericField::from_param(&form.value).ok_or_else(|| {
                AppError::BadRequest(format!("unknown numeric filter '{}'", form.value))
            })?),
            "reset" => Self::Reset,
            other => return Err(AppError::BadRequest(format!("unknown action '{other}'"))),
        };
        Ok(action)
    }
}

impl FilterAction {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ToggleCategory(_) => "toggle_category",
            Self::ToggleBrand(_) => "toggle_brand",
            Self::ToggleTag(_) => "toggle_tag",
            Self::SetInStock(_) => "set_in_stock",
            Self::SetRating(_) => "set_rating",
            Self::Inputs(_) => "inputs",
            Self::Clear(_) => "clear",
            Self::Reset => "reset",
        }
    }

    /// Run the action against a session.
    pub fn apply<N: Navigation>(self, session: &mut CatalogSession<N>) {
        match self {
            Self::ToggleCategory(value) => session.toggle_category(&value),
            Self::ToggleBrand(value) => session.toggle_brand(&value),
            Self::ToggleTag(value) => session.toggle_tag(&value),
            Self::SetInStock(in_stock) => session.set_in_stock(in_stock),
            Self::SetRating(rating) => session.set_rating(rating),
            Self::Inputs(inputs) => {
                session.commit_inputs(&inputs);
            }
            Self::Clear(field) => {
                let mut inputs = session.inputs().clone();
                inputs.set(field, String::new());
                session.commit_inputs(&inputs);
            }
            Self::Reset => session.reset(),
        }
    }
}

/// Page change form data.
#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub page: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Redirect the site root to the catalog.
pub async fn home() -> Redirect {
    Redirect::to(CATALOG_PATH)
}

/// Display the catalog for the requested URL.
///
/// An out-of-range page is corrected: plain requests are redirected, HTMX
/// requests get the fragment with `HX-Replace-Url`. History restores are
/// treated as plain requests since HTMX swaps them into `<body>`.
#[instrument(skip(state, headers))]
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let location = QueryParams::parse(query.as_deref().unwrap_or_default());
    let mut session = state.session(HtmxNavigation::new(CATALOG_PATH, location))?;
    let view = session.view();
    let nav = session.into_navigation();

    if is_htmx(&headers) && !is_history_restore(&headers) {
        return Ok(results(&state, &nav, view, None));
    }

    if nav.change().is_some() {
        debug!(url = %nav.url(), "Redirecting to corrected catalog URL");
        return Ok(Redirect::to(&nav.url()).into_response());
    }

    Ok(CatalogIndexTemplate {
        page: CatalogPage::new(view, state.config().catalog.input_debounce),
    }
    .into_response())
}

/// Apply one filter action (HTMX).
#[instrument(skip(state, headers))]
pub async fn apply_filter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<FilterForm>,
) -> Result<Response> {
    let action = FilterAction::try_from(form)?;
    add_breadcrumb("catalog", "Filter action", &[("action", action.name())]);

    let typed = match &action {
        FilterAction::Inputs(inputs) => Some(inputs.clone()),
        _ => None,
    };

    let location = current_location(&headers);
    let mut session = state.session(HtmxNavigation::new(CATALOG_PATH, location))?;
    action.apply(&mut session);
    let mut view = session.view();
    let nav = session.into_navigation();

    // Text that did not change the filters stays in the inputs as typed
    if let Some(typed) = typed
        && nav.change().is_none()
    {
        view.inputs = typed;
    }

    Ok(results(&state, &nav, view, None))
}

/// Move to another page (HTMX).
#[instrument(skip(state, headers))]
pub async fn change_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PageForm>,
) -> Result<Response> {
    let location = current_location(&headers);
    let mut session = state.session(HtmxNavigation::new(CATALOG_PATH, location))?;
    let change = session.go_to_page(form.page);
    let view = session.view();
    let nav = session.into_navigation();

    let trigger = change.scroll_to_top.then_some(SCROLL_TO_TOP_EVENT);
    Ok(results(&state, &nav, view, trigger))
}

/// Reload products and re-render the current URL (HTMX).
#[instrument(skip(state, headers))]
pub async fn reload(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    state.reload_catalog().await;

    let location = current_location(&headers);
    let mut session = state.session(HtmxNavigation::new(CATALOG_PATH, location))?;
    let view = session.view();
    let nav = session.into_navigation();

    Ok(results(&state, &nav, view, None))
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Results fragment with history and trigger headers.
fn results(
    state: &AppState,
    nav: &HtmxNavigation,
    view: CatalogView,
    trigger: Option<&'static str>,
) -> Response {
    let mut headers: Vec<(&'static str, String)> = nav.history_header().into_iter().collect();
    if let Some(event) = trigger {
        headers.push((HX_TRIGGER, event.to_string()));
    }

    (
        AppendHeaders(headers),
        CatalogResultsTemplate {
            page: CatalogPage::new(view, state.config().catalog.input_debounce),
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(action: &str, value: &str) -> FilterForm {
        FilterForm {
            action: action.to_string(),
            value: value.to_string(),
            ..FilterForm::default()
        }
    }

    #[test]
    fn test_parse_toggle() {
        let action = FilterAction::try_from(form("toggle_tag", "sale")).unwrap();
        assert_eq!(action, FilterAction::ToggleTag("sale".to_string()));
    }

    #[test]
    fn test_parse_in_stock() {
        assert_eq!(
            FilterAction::try_from(form("set_in_stock", "1")).unwrap(),
            FilterAction::SetInStock(true)
        );
        assert_eq!(
            FilterAction::try_from(form("set_in_stock", "")).unwrap(),
            FilterAction::SetInStock(false)
        );
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(
            FilterAction::try_from(form("set_rating", "4")).unwrap(),
            FilterAction::SetRating(Some(Decimal::from(4)))
        );
        assert_eq!(
            FilterAction::try_from(form("set_rating", "")).unwrap(),
            FilterAction::SetRating(None)
        );
    }

    #[test]
    fn test_parse_inputs() {
        let action = FilterAction::try_from(FilterForm {
            action: "inputs".to_string(),
            min: "5".to_string(),
            min_stock: "2".to_string(),
            ..FilterForm::default()
        })
        .unwrap();

        let FilterAction::Inputs(inputs) = action else {
            panic!("expected inputs action");
        };
        assert_eq!(inputs.min_price, "5");
        assert_eq!(inputs.min_stock, "2");
        assert_eq!(inputs.max_price, "");
    }

    #[test]
    fn test_parse_clear() {
        assert_eq!(
            FilterAction::try_from(form("clear", "minStock")).unwrap(),
            FilterAction::Clear(NumericField::MinStock)
        );
        assert!(FilterAction::try_from(form("clear", "page")).is_err());
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = FilterAction::try_from(form("drop_tables", "")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
