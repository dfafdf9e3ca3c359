use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::import::ImportError;
use crate::storage::StorageError;

/// Error returned by HTTP handlers, rendered as `{ "error": "..." }`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidInput(_) => Self::BadRequest(err.to_string()),
            StorageError::WordNotFound(_) | StorageError::UserNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            StorageError::Sqlite(_) | StorageError::Io(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(_) | AuthError::EmailTaken => Self::BadRequest(err.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidSession => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::Hash(_) => Self::Internal(err.to_string()),
            AuthError::Storage(inner) => inner.into(),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Storage(inner) => inner.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self);
            // Internal details stay in the log
            return (status, Json(json!({ "error": "Internal server error" }))).into_response();
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
