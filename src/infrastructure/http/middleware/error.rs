use crate::domain::errors::DomainError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// No credential was presented.
    Unauthorized,
    /// A credential was presented but failed verification.
    InvalidToken,
    /// Wrong login id or password.
    InvalidLogin,
    /// Authenticated, but the role lacks the named action.
    PermissionDenied(String),
    Forbidden(String),
    Internal(String),
    Conflict(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::InvalidToken => write!(f, "Invalid token"),
            ApiError::InvalidLogin => write!(f, "Invalid login"),
            ApiError::PermissionDenied(action) => write!(f, "Permission denied: {}", action),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Authentication required" }),
            ),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid or expired token" }),
            ),
            ApiError::InvalidLogin => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid login credentials" }),
            ),
            ApiError::PermissionDenied(action) => (
                StatusCode::FORBIDDEN,
                json!({
                    "error": format!("Permission denied: {} required", action),
                    "required_permission": action,
                }),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            // The only place a credential other than a token is checked is login.
            DomainError::InvalidCredential => ApiError::InvalidLogin,
            DomainError::PermissionDenied(action) => ApiError::PermissionDenied(action),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
            // Never reported as a denial.
            DomainError::StoreUnavailable(msg) => {
                ApiError::Internal(format!("Store unavailable: {}", msg))
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::from(err).into()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
