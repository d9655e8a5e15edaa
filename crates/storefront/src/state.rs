//! Application state shared across handlers.

use std::sync::{Arc, RwLock};

use catalog_core::{CatalogSession, LoadState, Navigation, ProductSource};
use tracing::{info, instrument};

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::source::{CatalogSource, LocalSource, RemoteSource};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The loaded catalog sits behind
/// a lock and is filled by a background task; each request builds its own
/// short-lived [`CatalogSession`] over it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    source: CatalogSource,
    catalog: RwLock<LoadState>,
}

impl AppState {
    /// Create a new application state with products still loading.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for the remote feed cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, reqwest::Error> {
        let remote = RemoteSource::new(&config.catalog)?;
        let source = CatalogSource::new(remote, LocalSource::default());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                source,
                catalog: RwLock::new(LoadState::Loading),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Snapshot of the catalog load state.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the lock is poisoned.
    pub fn load_state(&self) -> Result<LoadState, AppError> {
        self.inner
            .catalog
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| AppError::Internal("Catalog lock poisoned".to_string()))
    }

    fn set_load_state(&self, state: LoadState) {
        match self.inner.catalog.write() {
            Ok(mut guard) => *guard = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }

    /// Whether the catalog is still loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.load_state().map_or(true, |state| state.is_loading())
    }

    /// Build a session over the current catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the lock is poisoned.
    pub fn session<N: Navigation>(&self, nav: N) -> Result<CatalogSession<N>, AppError> {
        Ok(CatalogSession::with_state(
            nav,
            self.load_state()?,
            self.config().catalog.session_options(),
        ))
    }

    /// Load products and install them, replacing the previous collection.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) {
        self.set_load_state(LoadState::Loading);
        let result = self.inner.source.load_products().await;
        self.set_load_state(LoadState::from_result(result));
    }

    /// Drop cached feed responses and load again.
    pub async fn reload_catalog(&self) {
        info!("Reloading catalog");
        self.inner.source.primary().invalidate();
        self.load_catalog().await;
    }

    /// Spawn a background task loading the catalog.
    ///
    /// Until it completes, sessions see [`LoadState::Loading`].
    pub fn start_loading(&self) {
        let state = self.clone();
        info!("Spawning background catalog load task");
        tokio::spawn(async move {
            state.load_catalog().await;
        });
    }
}
