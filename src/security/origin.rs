//! Origin policy and CORS handling.
//!
//! Runs before every other gate. Requests without an `Origin` header pass
//! untouched; requests with one must match the allow-list exactly or are
//! answered with a bare 403 that a browser reports as a network error.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::ApiError;
use crate::observability::metrics;

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Outcome of evaluating a request's declared origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginDecision {
    /// No origin declared (same-origin or non-browser client).
    Absent,
    /// Origin matched an allow-list entry.
    Allowed,
    /// Origin declared but not on the allow-list.
    Rejected,
}

impl OriginDecision {
    pub fn is_rejected(self) -> bool {
        self == OriginDecision::Rejected
    }
}

/// Exact-match origin allow-list. The list can be swapped at runtime.
pub struct OriginPolicy {
    allowed: ArcSwap<Vec<String>>,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self {
            allowed: ArcSwap::from_pointee(allowed),
        }
    }

    /// Decide on a declared origin. An empty string counts as absent.
    pub fn evaluate(&self, origin: Option<&str>) -> OriginDecision {
        match origin {
            None | Some("") => OriginDecision::Absent,
            Some(origin) => {
                if self.allowed.load().iter().any(|o| o == origin) {
                    OriginDecision::Allowed
                } else {
                    OriginDecision::Rejected
                }
            }
        }
    }

    /// Replace the allow-list. In-flight evaluations keep the old list.
    pub fn replace(&self, allowed: Vec<String>) {
        tracing::info!(origins = ?allowed, "Origin allow-list updated");
        self.allowed.store(Arc::new(allowed));
    }

    pub fn allowed_origins(&self) -> Arc<Vec<String>> {
        self.allowed.load_full()
    }
}

/// Reads the `Origin` header. A header that is not valid ASCII is treated as
/// a non-matching origin rather than an absent one.
fn declared_origin(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ORIGIN)
        .map(|v| v.to_str().unwrap_or("\u{0}"))
}

/// Middleware enforcing the origin policy and answering pre-flights.
pub async fn origin_middleware(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = declared_origin(request.headers()).map(str::to_owned);
    let decision = policy.evaluate(origin.as_deref());

    if decision.is_rejected() {
        tracing::warn!(
            origin = origin.as_deref().unwrap_or_default(),
            method = %request.method(),
            path = %request.uri().path(),
            "Origin rejected"
        );
        metrics::record_origin_rejected();
        return ApiError::OriginRejected.into_response();
    }

    if is_preflight(&request) {
        return preflight_response(origin.as_deref(), request.headers());
    }

    let mut response = next.run(request).await;
    if let (OriginDecision::Allowed, Some(origin)) = (decision, origin) {
        add_allow_origin(response.headers_mut(), &origin);
        response
            .headers_mut()
            .append(header::VARY, HeaderValue::from_static("Origin"));
    }
    response
}

/// A CORS pre-flight is an `OPTIONS` request naming the method it asks for.
fn is_preflight(request: &Request<Body>) -> bool {
    request.method() == Method::OPTIONS
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

fn preflight_response(origin: Option<&str>, request_headers: &HeaderMap) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();

    if let Some(origin) = origin {
        add_allow_origin(headers, origin);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    if let Some(requested) = request_headers.get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
    }
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    headers.append(
        header::VARY,
        HeaderValue::from_static("Access-Control-Request-Headers"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
    response
}

fn add_allow_origin(headers: &mut HeaderMap, origin: &str) {
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> OriginPolicy {
        OriginPolicy::new(vec![
            "http://localhost:5173".to_string(),
            "https://gravta.com".to_string(),
        ])
    }

    #[test]
    fn test_absent_origin_accepted() {
        assert_eq!(policy().evaluate(None), OriginDecision::Absent);
        assert_eq!(policy().evaluate(Some("")), OriginDecision::Absent);
    }

    #[test]
    fn test_exact_match_only() {
        let p = policy();
        assert_eq!(p.evaluate(Some("https://gravta.com")), OriginDecision::Allowed);
        assert_eq!(p.evaluate(Some("http://localhost:5173")), OriginDecision::Allowed);

        assert_eq!(p.evaluate(Some("https://www.gravta.com")), OriginDecision::Rejected);
        assert_eq!(p.evaluate(Some("https://gravta.com/")), OriginDecision::Rejected);
        assert_eq!(p.evaluate(Some("http://gravta.com")), OriginDecision::Rejected);
        assert_eq!(p.evaluate(Some("https://GRAVTA.com")), OriginDecision::Rejected);
        assert_eq!(p.evaluate(Some("http://localhost:5174")), OriginDecision::Rejected);
        assert_eq!(p.evaluate(Some("null")), OriginDecision::Rejected);
    }

    #[test]
    fn test_replace_allow_list() {
        let p = policy();
        p.replace(vec!["https://new.example".to_string()]);
        assert_eq!(p.evaluate(Some("https://new.example")), OriginDecision::Allowed);
        assert_eq!(p.evaluate(Some("https://gravta.com")), OriginDecision::Rejected);
        assert_eq!(p.allowed_origins().len(), 1);
    }

    #[test]
    fn test_non_ascii_origin_is_not_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_bytes(b"https://\xffexample").unwrap());
        let origin = declared_origin(&headers);
        assert!(policy().evaluate(origin).is_rejected());
    }

    #[test]
    fn test_preflight_headers() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type"),
        );
        let response = preflight_response(Some("https://gravta.com"), &request_headers);

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://gravta.com");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
    }

    #[test]
    fn test_preflight_needs_requested_method() {
        let plain = Request::builder()
            .method(Method::OPTIONS)
            .uri("/contact")
            .body(Body::empty())
            .unwrap();
        assert!(!is_preflight(&plain));

        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri("/contact")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        assert!(is_preflight(&preflight));

        let post = Request::builder()
            .method(Method::POST)
            .uri("/contact")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        assert!(!is_preflight(&post));
    }
}
