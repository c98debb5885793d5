//! Fixed-window rate limiting per client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::config::RateLimitConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::security::client_ip::client_identity;

/// Counter for one client within its current window.
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    started: Instant,
}

/// Result of a rate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets.
    pub reset_after: Duration,
}

/// Per-client fixed window counter.
///
/// A window opens on a client's first request and lasts `window`. Up to
/// `max_requests` are admitted; further requests are denied without being
/// counted until the window elapses.
pub struct FixedWindowLimiter {
    windows: DashMap<String, RateWindow>,
    window: Duration,
    max_requests: u32,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_requests,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.window(), config.max_requests)
    }

    /// Check and, if admitted, count a request from `client` at `now`.
    pub fn check(&self, client: &str, now: Instant) -> RateDecision {
        // The entry guard holds the shard lock, so check-and-increment is atomic per client.
        let mut entry = self
            .windows
            .entry(client.to_owned())
            .or_insert(RateWindow { count: 0, started: now });

        let window = entry.value_mut();
        if now.duration_since(window.started) >= self.window {
            window.count = 0;
            window.started = now;
        }

        let reset_after = self.window.saturating_sub(now.duration_since(window.started));

        if window.count >= self.max_requests {
            return RateDecision {
                allowed: false,
                limit: self.max_requests,
                remaining: 0,
                reset_after,
            };
        }

        window.count += 1;
        RateDecision {
            allowed: true,
            limit: self.max_requests,
            remaining: self.max_requests - window.count,
            reset_after,
        }
    }

    /// Drop windows that have fully elapsed. Returns how many were removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// Periodically sweep expired windows until shutdown.
pub async fn run_sweeper(
    limiter: Arc<FixedWindowLimiter>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = limiter.sweep(Instant::now());
                let tracked = limiter.tracked_clients();
                metrics::record_tracked_clients(tracked);
                if removed > 0 {
                    tracing::debug!(removed, tracked, "Swept expired rate windows");
                }
            }
            _ = shutdown.recv() => {
                tracing::debug!("Rate limit sweeper stopping");
                break;
            }
        }
    }
}

/// State for the rate limit middleware.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<FixedWindowLimiter>,
    pub trusted_proxy_hops: usize,
}

/// Middleware applying the limiter to every request.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client = client_identity(peer, request.headers(), state.trusted_proxy_hops);

    let decision = state.limiter.check(&client, Instant::now());

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        metrics::record_rate_limited();
        let mut response = ApiError::RateLimited.into_response();
        let retry_after = decision.reset_after.as_secs_f64().ceil() as u64;
        response
            .headers_mut()
            .insert("retry-after", HeaderValue::from(retry_after));
        response
    };

    add_rate_headers(response.headers_mut(), &decision);
    response
}

fn add_rate_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    let reset_at = SystemTime::now()
        .checked_add(decision.reset_after)
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or_default();

    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(reset_at));
}
