//! Donation-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | Unauthenticated | 401 |
//! | Forbidden | 403 |
//! | NotFound | 404 |
//! | Gateway | 500 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DonationError {
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Donation not found")]
    NotFound,

    /// The gateway declined the charge or could not be reached.
    #[error("Charge for order {order_number} failed: {reason}")]
    Gateway { reason: String, order_number: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl DonationError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DonationError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        DonationError::Forbidden(message.into())
    }

    pub fn gateway(reason: impl Into<String>, order_number: impl Into<String>) -> Self {
        DonationError::Gateway {
            reason: reason.into(),
            order_number: order_number.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        DonationError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DonationError::Validation { .. } => ErrorCode::ValidationFailed,
            DonationError::Unauthenticated => ErrorCode::Unauthorized,
            DonationError::Forbidden(_) => ErrorCode::Forbidden,
            DonationError::NotFound => ErrorCode::DonationNotFound,
            DonationError::Gateway { .. } => ErrorCode::PaymentFailed,
            DonationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for DonationError {
    fn from(err: ValidationError) -> Self {
        DonationError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for DonationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => DonationError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::Unauthorized => DonationError::Unauthenticated,
            ErrorCode::Forbidden => DonationError::Forbidden(err.message),
            ErrorCode::NotFound | ErrorCode::DonationNotFound => DonationError::NotFound,
            _ => DonationError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_keeps_field_name() {
        let err: DonationError = ValidationError::empty_field("prime").into();
        assert!(matches!(
            err,
            DonationError::Validation { ref field, .. } if field == "prime"
        ));
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn forbidden_domain_error_stays_forbidden() {
        let err: DonationError = DomainError::new(ErrorCode::Forbidden, "not yours").into();
        assert_eq!(err, DonationError::Forbidden("not yours".to_string()));
    }

    #[test]
    fn database_error_becomes_infrastructure() {
        let err: DonationError = DomainError::database("connection reset").into();
        assert!(matches!(err, DonationError::Infrastructure(ref m) if m.contains("connection reset")));
    }

    #[test]
    fn gateway_error_mentions_order_number() {
        let err = DonationError::gateway("card_declined", "donation-20240101000000-abc");
        assert!(err.to_string().contains("donation-20240101000000-abc"));
        assert_eq!(err.code(), ErrorCode::PaymentFailed);
    }
}
