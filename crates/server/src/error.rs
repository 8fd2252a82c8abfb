//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry and logged before the client sees a generic message;
//! everything else is answered with the failure envelope
//! `{"success": false, "message": ...}` and a matching status code.

use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiResponse;
use crate::services::{AuthError, CartError, CatalogError, OrderError, UploadError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Account or token operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    /// Status code and client-facing message.
    ///
    /// Internal details never reach the message of a 5xx response.
    fn status_and_message(&self) -> (StatusCode, String) {
        let internal = || (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned());

        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
                RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => internal(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_owned())
                }
                AuthError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, "Not authorized, login again".to_owned())
                }
                AuthError::UserAlreadyExists => (
                    StatusCode::CONFLICT,
                    "An account with this email already exists".to_owned(),
                ),
                AuthError::InvalidEmail(_) => {
                    (StatusCode::BAD_REQUEST, "Please enter a valid email".to_owned())
                }
                AuthError::MissingName | AuthError::WeakPassword(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                AuthError::TokenEncoding(_)
                | AuthError::TokenLifetime(_)
                | AuthError::Repository(_)
                | AuthError::PasswordHash => {
                    internal()
                }
            },
            Self::Cart(err) => match err {
                CartError::MissingItemId | CartError::InvalidQuantity => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                CartError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_owned()),
                CartError::Repository(_) => internal(),
            },
            Self::Catalog(err) => match err {
                CatalogError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CatalogError::NotFound => (StatusCode::NOT_FOUND, "Food not found".to_owned()),
                CatalogError::Upload(UploadError::InvalidName(_)) => {
                    (StatusCode::BAD_REQUEST, "Invalid file name".to_owned())
                }
                CatalogError::Upload(UploadError::Io(_)) | CatalogError::Repository(_) => {
                    internal()
                }
            },
            Self::Order(err) => match err {
                OrderError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                OrderError::AlreadyPaid => {
                    (StatusCode::BAD_REQUEST, "Order is already paid".to_owned())
                }
                OrderError::NotFound => (StatusCode::NOT_FOUND, "Order not found".to_owned()),
                OrderError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_owned()),
                OrderError::Repository(_) => internal(),
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, ApiResponse::<()>::failure(message)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Called after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
