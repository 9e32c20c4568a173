use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Missing, malformed, forged or expired credential. Never says which.
    #[error("Invalid credential")]
    InvalidCredential,
    /// Authenticated principal lacks the named action.
    #[error("Permission denied: {0} required")]
    PermissionDenied(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal error: {0}")]
    Internal(String),
    /// The backing store could not answer. Distinct from a denial.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn permission_denied(action: crate::domain::permissions::Action) -> Self {
        DomainError::PermissionDenied(action.as_str().to_string())
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if message.contains("UNIQUE") || message.contains("unique") {
                    DomainError::Conflict("Resource already exists".to_string())
                } else if message.contains("FOREIGN KEY") {
                    DomainError::ValidationError("Referenced resource does not exist".to_string())
                } else {
                    DomainError::StoreUnavailable(format!("Database error: {}", message))
                }
            }
            other => DomainError::StoreUnavailable(other.to_string()),
        }
    }
}
