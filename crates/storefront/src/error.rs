//! Request errors and their HTTP responses.
//!
//! Handlers return [`Result`]; anything that reaches the client as a 5xx is
//! reported to Sentry first and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Error returned by storefront handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no page at {0}")]
    NotFound(String),

    /// Malformed form data or an unknown filter action.
    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show to the visitor.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "Something went wrong. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, self.public_message()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Record a visitor action as a Sentry breadcrumb.
///
/// The trail shows up on any error reported later in the same scope.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
            .collect(),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("/x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::Internal("catalog lock poisoned".into());
        assert!(!err.public_message().contains("poisoned"));

        let err = AppError::BadRequest("unknown action 'x'".into());
        assert_eq!(err.public_message(), "invalid request: unknown action 'x'");
    }

    #[test]
    fn test_breadcrumb_without_client_is_noop() {
        add_breadcrumb("catalog", "Filter action", &[("action", "reset")]);
    }
}
