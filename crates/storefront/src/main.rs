//! Catalog storefront server.
//!
//! Serves the product catalog (port 3000 by default). Products are fetched
//! in the background at startup; until they arrive pages show a loading
//! state and `/health/ready` answers 503.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use catalog_storefront::config::StorefrontConfig;
use catalog_storefront::state::AppState;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "catalog_storefront=info,catalog_core=info,tower_http=debug";

#[derive(Debug, Error)]
enum StartupError {
    #[error("HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet
            eprintln!("catalog-storefront: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the runtime and the subscriber
    let _sentry = init_sentry(&config);
    init_tracing();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(serve(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Storefront stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: StorefrontConfig) -> Result<(), StartupError> {
    let addr = config.socket_addr();
    let state = AppState::new(config)?;
    state.start_loading();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Storefront listening");

    axum::serve(listener, catalog_storefront::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Storefront shut down");
    Ok(())
}

/// Returns the guard that flushes queued events on drop.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Into::into),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}

/// Log to stdout; warnings and errors become Sentry events, info and debug
/// become breadcrumbs.
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let sentry_layer = sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
