use crate::core::SanitizeError;
use crate::models::ErrorResponse;
use crate::services::{IdentityError, StoreError};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// API-level error taxonomy, mapped onto HTTP statuses.
///
/// Store and identity-provider failures keep their source for logging but
/// return a generic message to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Token not found")]
    AuthenticationMissing,

    #[error("Unauthorized access")]
    AuthenticationInvalid,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Server error")]
    Store(#[source] StoreError),

    #[error("Server error")]
    Identity(#[source] IdentityError),
}

impl ApiError {
    fn label(&self) -> &'static str {
        match self {
            ApiError::AuthenticationMissing => "authentication_missing",
            ApiError::AuthenticationInvalid => "authentication_invalid",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidIdentifier(_) => "invalid_identifier",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Conflict(_) => "conflict",
            ApiError::Store(_) => "server_error",
            ApiError::Identity(_) => "server_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationMissing | ApiError::AuthenticationInvalid => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidIdentifier(_) | ApiError::Validation(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(_) | ApiError::Identity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal detail is logged here and never leaks into the body
        match self {
            ApiError::Store(source) => tracing::error!("Store failure: {}", source),
            ApiError::Identity(source) => tracing::error!("Identity provider failure: {}", source),
            other => tracing::info!("Request rejected: {}", other),
        }

        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.label().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(format!("Not found: {}", what)),
            StoreError::AlreadyPurchased(_) => {
                ApiError::Conflict("Model already purchased".to_string())
            }
            other => ApiError::Store(other),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Unauthorized => ApiError::AuthenticationInvalid,
            other => ApiError::Identity(other),
        }
    }
}

impl From<SanitizeError> for ApiError {
    fn from(err: SanitizeError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}
