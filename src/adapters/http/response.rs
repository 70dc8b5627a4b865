//! JSend response envelope.
//!
//! ```text
//! 2xx  {"status":"success","data":{...}}
//! 4xx  {"status":"fail","data":{"<field>":"<message>"},"code":"..."}
//! 5xx  {"status":"error","message":"...","code":"..."}
//! ```
//!
//! Every handler returns `Result<_, ApiError>`, so no error leaves the service
//! in another shape.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::domain::account::AccountError;
use crate::domain::donation::DonationError;
use crate::domain::foundation::{AuthError, ErrorCode};

/// Wraps `data` in a success envelope.
pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "status": "success", "data": data }))).into_response()
}

/// An error on its way to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    /// Key under `data` for client errors.
    pub field: String,
    pub message: String,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: ErrorCode,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed, field, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "authorization",
            message,
        )
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ErrorCode::Forbidden, "user_id", message)
    }

    pub fn internal(code: ErrorCode) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            code,
            "",
            "Internal server error",
        )
    }

    fn body(&self) -> Value {
        if self.status.is_server_error() {
            json!({
                "status": "error",
                "message": self.message,
                "code": self.code.to_string(),
            })
        } else {
            let mut data = Map::new();
            data.insert(self.field.clone(), Value::String(self.message.clone()));
            json!({
                "status": "fail",
                "data": data,
                "code": self.code.to_string(),
            })
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        (self.status, Json(body)).into_response()
    }
}

impl From<DonationError> for ApiError {
    fn from(err: DonationError) -> Self {
        match err {
            DonationError::Validation { field, message } => ApiError::bad_request(field, message),
            DonationError::Unauthenticated => ApiError::unauthenticated("Authentication required"),
            DonationError::Forbidden(message) => ApiError::forbidden(message),
            DonationError::NotFound => ApiError::new(
                StatusCode::NOT_FOUND,
                ErrorCode::DonationNotFound,
                "id",
                "Donation not found",
            ),
            DonationError::Gateway {
                reason,
                order_number,
            } => {
                tracing::error!(order_number = %order_number, reason = %reason, "Responding with payment failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::PaymentFailed,
                    "",
                    "Payment could not be completed",
                )
            }
            DonationError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Responding with internal error");
                ApiError::internal(ErrorCode::InternalError)
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation { field, message } => ApiError::bad_request(field, message),
            AccountError::InvalidActivation => {
                ApiError::unauthenticated("Invalid or expired activation token")
            }
            AccountError::Unauthenticated => ApiError::unauthenticated("Authentication required"),
            AccountError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Responding with internal error");
                ApiError::internal(ErrorCode::InternalError)
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::IssuanceFailed(detail) => {
                tracing::error!(error = %detail, "Token issuance failed");
                ApiError::internal(ErrorCode::InternalError)
            }
            other => ApiError::unauthenticated(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("body", rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::bad_request("body", rejection.body_text())
    }
}
