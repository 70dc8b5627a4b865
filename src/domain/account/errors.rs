//! Account-specific error types.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | InvalidActivation | 401 |
//! | Unauthenticated | 401 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Activation token missing, expired, already used, or wrong.
    #[error("Invalid or expired activation token")]
    InvalidActivation,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl AccountError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        AccountError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AccountError::Validation { .. } => ErrorCode::ValidationFailed,
            AccountError::InvalidActivation | AccountError::Unauthenticated => {
                ErrorCode::Unauthorized
            }
            AccountError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
}

impl From<ValidationError> for AccountError {
    fn from(err: ValidationError) -> Self {
        AccountError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for AccountError {
    fn from(err: DomainError) -> Self {
        AccountError::Infrastructure(err.to_string())
    }
}

impl From<AuthError> for AccountError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::IssuanceFailed(reason) => AccountError::Infrastructure(reason),
            _ => AccountError::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_token_is_unauthenticated() {
        assert_eq!(
            AccountError::from(AuthError::TokenExpired),
            AccountError::Unauthenticated
        );
    }

    #[test]
    fn issuance_failure_is_infrastructure() {
        let err = AccountError::from(AuthError::IssuanceFailed("bad key".into()));
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[test]
    fn validation_error_keeps_field() {
        let err = AccountError::from(ValidationError::empty_field("email"));
        assert!(matches!(err, AccountError::Validation { ref field, .. } if field == "email"));
    }
}
