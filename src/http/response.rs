//! Error responses.
//!
//! Every failure a client can observe is an [`ApiError`]. Client-facing
//! messages are fixed strings; underlying causes are logged where they occur
//! and never echoed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::contact::ContactError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Full name and work email are required.")]
    Validation,
    #[error("Invalid request body.")]
    MalformedBody,
    #[error("Request body too large.")]
    PayloadTooLarge,
    #[error("Too many requests from this IP, please try again later.")]
    RateLimited,
    #[error("The CORS policy for this site does not allow access from the specified Origin.")]
    OriginRejected,
    #[error("Internal server error.")]
    Internal,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::Validation | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::OriginRejected => StatusCode::FORBIDDEN,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation => ApiError::Validation,
            ContactError::Persistence(_) => ApiError::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Browsers surface this as a network error; there is no body contract.
            ApiError::OriginRejected => self.status().into_response(),
            // Plain text, like the rest of the throttling responses.
            ApiError::RateLimited => (self.status(), self.to_string()).into_response(),
            _ => (
                self.status(),
                Json(ErrorBody {
                    message: self.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
