use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::{Error, Result as StoreResult};
use crate::server::templates;

/// Handler error that converts to a proper HTTP response with a small HTML
/// body.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = templates::error_page(self.status, &self.message);
        (self.status, Html(body)).into_response()
    }
}

/// Extension trait for converting store results to handler errors. NotFound
/// keeps its status; everything else becomes a 500 with the given message.
pub trait StoreResultExt<T> {
    fn app_err(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn app_err(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| match e {
            Error::NotFound => AppError::not_found(message),
            _ => AppError::internal(message),
        })
    }
}

/// Extension for Option types from store operations.
pub trait StoreOptionExt<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> StoreOptionExt<T> for Option<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, AppError> {
        self.ok_or_else(|| AppError::not_found(message))
    }
}
