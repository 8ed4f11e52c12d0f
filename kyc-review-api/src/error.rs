use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Users cannot delete their own account")]
    SelfDeletion,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ApiError {
    /// Stable machine-readable kind, used as the `error` field of HTTP responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "validation",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::SelfDeletion => "self_deletion",
            ApiError::InvalidState(_) => "invalid_state",
            ApiError::Conflict(_) => "conflict",
            ApiError::UpstreamError(_) => "upstream",
            ApiError::InternalError(_) => "internal",
            ApiError::DatabaseError(_) => "database",
        }
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{entity} {id}"))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for ApiError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        ApiError::DatabaseError(error.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_become_database_errors() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = "Transaction has been consumed".into();
        let error: ApiError = boxed.into();
        assert_eq!(error.kind(), "database");
        assert!(error.to_string().contains("Transaction has been consumed"));
    }

    #[test]
    fn test_not_found_is_distinct_from_validation() {
        let error = ApiError::not_found("kyc", "42");
        assert_eq!(error.kind(), "not_found");
        assert_eq!(error.to_string(), "Not found: kyc 42");
    }
}
