//! HTTP error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. An `AppError` pairs the specific
//! [`DispatchError`] (logged, and captured to Sentry for storage faults) with
//! the coarse message the operator sees for that page.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::services::DispatchError;
use crate::views::MessageTemplate;

/// Application-level error type for the dispatch pages.
#[derive(Debug, Error)]
#[error("{message}: {source}")]
pub struct AppError {
    /// Coarse, page-specific text shown to the operator.
    message: &'static str,
    /// What actually went wrong.
    #[source]
    source: DispatchError,
}

impl AppError {
    /// Pair an error with the message shown on the page that failed.
    #[must_use]
    pub const fn new(message: &'static str, source: DispatchError) -> Self {
        Self { message, source }
    }

    /// Adapter for `map_err`: `.map_err(AppError::context("Error in new_order"))`.
    pub fn context(message: &'static str) -> impl FnOnce(DispatchError) -> Self + Copy {
        move |source| Self::new(message, source)
    }

    /// The underlying error.
    #[must_use]
    pub const fn source_error(&self) -> &DispatchError {
        &self.source
    }

    /// HTTP status for the error kind.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match &self.source {
            DispatchError::Validation { .. } => StatusCode::BAD_REQUEST,
            DispatchError::NotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::BusinessRule(_) => StatusCode::CONFLICT,
            DispatchError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the operator.
    ///
    /// Business-rule rejections explain themselves; everything else gets the
    /// page's coarse message so internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match &self.source {
            DispatchError::BusinessRule(reason) => reason.clone(),
            _ => self.message.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self.source, DispatchError::Storage(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                kind = self.source.kind(),
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, kind = self.source.kind(), "Request rejected");
        }

        let status = self.status();
        let body = MessageTemplate::error(self.user_message())
            .render()
            .unwrap_or_else(|e| {
                tracing::error!("Template render error: {}", e);
                "Internal Server Error".to_string()
            });

        (status, Html(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RepositoryError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::new("Error in new_order", DispatchError::missing("address_from"));
        assert_eq!(
            err.to_string(),
            "Error in new_order: invalid field 'address_from': is required"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::new("x", DispatchError::missing("name"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::new("x", DispatchError::not_found("order", 1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::new(
                "x",
                DispatchError::BusinessRule("no".to_string())
            )),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::new(
                "x",
                DispatchError::Storage(RepositoryError::Database(sqlx::Error::PoolTimedOut))
            )),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_user_message_hides_storage_details() {
        let err = AppError::new(
            "Error in new_client",
            DispatchError::Storage(RepositoryError::Database(sqlx::Error::PoolTimedOut)),
        );
        assert_eq!(err.user_message(), "Error in new_client");
    }

    #[test]
    fn test_user_message_explains_business_rule() {
        let err = AppError::new(
            "Error happened during cancelling",
            DispatchError::BusinessRule("Order cannot be cancelled".to_string()),
        );
        assert_eq!(err.user_message(), "Order cannot be cancelled");
    }
}
