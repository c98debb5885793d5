//! Request identification and body extraction.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the client did not send one
//! - Decode contact bodies as JSON or form-encoded based on `Content-Type`
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Unknown or missing content types decode to an empty input, which then
//!   fails validation instead of failing parsing

use axum::{
    extract::{FromRequest, Request},
    http::{header, HeaderValue, StatusCode},
    Form, Json,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::contact::ContactInput;
use crate::http::response::ApiError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(request: &Request) -> BodyKind {
    let mime = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")) {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

fn rejection_error(status: StatusCode) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::MalformedBody
    }
}

impl<S> FromRequest<S> for ContactInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => match Json::<ContactInput>::from_request(req, state).await {
                Ok(Json(input)) => Ok(input),
                Err(rejection) => {
                    tracing::debug!(error = %rejection, "Rejected JSON body");
                    Err(rejection_error(rejection.status()))
                }
            },
            BodyKind::Form => match Form::<ContactInput>::from_request(req, state).await {
                Ok(Form(input)) => Ok(input),
                Err(rejection) => {
                    tracing::debug!(error = %rejection, "Rejected form body");
                    Err(rejection_error(rejection.status()))
                }
            },
            BodyKind::Other => Ok(ContactInput::default()),
        }
    }
}
