//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chef_em_casa_core::chef::FRIENDLY_FALLBACK;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{ChefError, IdentityError};

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data file operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The chef model could not answer.
    #[error("Chef error: {0}")]
    Chef(#[from] ChefError),

    /// Google sign-in failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Repository(err) => match err {
                RepositoryError::Validation(_) => StatusCode::BAD_REQUEST,
                RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
                RepositoryError::Io(_) | RepositoryError::Encode(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Chef(_) | Self::Identity(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Repository(RepositoryError::Io(_) | RepositoryError::Encode(_)) => {
                "Internal server error".to_string()
            }
            Self::Repository(RepositoryError::Validation(e)) => e.to_string(),
            Self::Repository(RepositoryError::NotFound(what)) => format!("Not found: {what}"),
            Self::Chef(_) | Self::Identity(_) => FRIENDLY_FALLBACK.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chef_em_casa_core::ValidationError;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("recipe 123".to_string());
        assert_eq!(err.to_string(), "Not found: recipe 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Chef(ChefError::EmptyAnswer)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Identity(IdentityError::OAuth("denied".to_string()))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_repository_errors_map_by_kind() {
        assert_eq!(
            get_status(RepositoryError::Validation(ValidationError::MissingField("title")).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RepositoryError::NotFound("user u1".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RepositoryError::Io(std::io::Error::other("disk full")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_storage_failure_hides_details() {
        let err: AppError = RepositoryError::Io(std::io::Error::other("/var/data/db.json")).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Internal server error");
    }
}
