//! HTTP error mapping
//!
//! Translates catalog failures into stable status codes and JSON bodies:
//! validation -> 422, missing record -> 404, storage -> 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bookshelf_core::{BookId, CatalogError, DbError, FieldViolation, RepoError, ValidationError};
use log::error;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error body: `{"detail": ...}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldViolation>),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

/// Failure of one HTTP request.
#[derive(Debug)]
pub enum ApiError {
    /// Body, path or query input failed validation.
    Validation(ValidationError),
    /// Referenced book does not exist.
    NotFound(BookId),
    /// Storage or runtime failure; details are logged, not returned.
    Internal(String),
}

impl ApiError {
    /// Wraps an extractor rejection as a validation failure on `field`.
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::single(field, message))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Validation(err) => Self::Validation(err),
            CatalogError::NotFound(id) => Self::NotFound(id),
            CatalogError::Storage(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        CatalogError::from(value).into()
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::Validation(err) => ErrorDetail::Fields(err.violations().to_vec()),
            Self::NotFound(id) => ErrorDetail::Message(format!("book not found: {id}")),
            Self::Internal(message) => {
                error!("event=http_error module=api status=error error={message}");
                ErrorDetail::Message("storage failure".to_string())
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
