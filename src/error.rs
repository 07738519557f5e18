//! Client-facing error taxonomy.
//!
//! Every failure that crosses the HTTP boundary collapses into one of three
//! kinds. Module-level errors (gateway, store, config) keep their detail for
//! the logs and never reach the response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::gateway::types::error_codes;

/// Error returned by the two payment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// No verified caller identity was attached to the request.
    #[error("The function must be called while authenticated.")]
    Unauthenticated,

    /// Missing or malformed input, or a signature mismatch.
    #[error("{0}")]
    InvalidArgument(String),

    /// Misconfiguration, upstream gateway failure or persistence failure.
    /// The message is generic by construction.
    #[error("{0}")]
    Internal(&'static str),
}

impl PaymentError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Wire name of the error kind.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Unauthenticated => error_codes::UNAUTHENTICATED,
            Self::InvalidArgument(_) => error_codes::INVALID_ARGUMENT,
            Self::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body for payment errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentErrorResponse {
    #[schema(example = 1001)]
    pub code: i32,
    #[schema(example = "INVALID_ARGUMENT")]
    pub status: &'static str,
    #[schema(example = "Payment signature does not match.")]
    pub message: String,
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let body = PaymentErrorResponse {
            code: self.code(),
            status: self.status(),
            message: self.to_string(),
        };
        (self.http_status(), Json(body)).into_response()
    }
}
