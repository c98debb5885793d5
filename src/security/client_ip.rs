//! Client identity for rate limiting.
//!
//! With `trusted_hops = 0` the peer address is the identity and
//! `X-Forwarded-For` is ignored. With `N` trusted hops, the chain
//! `[forwarded..., peer]` is read right to left and the entry just past the
//! last trusted proxy is used.

use std::net::IpAddr;

use axum::http::HeaderMap;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

pub fn client_identity(peer: Option<IpAddr>, headers: &HeaderMap, trusted_hops: usize) -> String {
    let peer = peer
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if trusted_hops == 0 {
        return peer;
    }

    let mut chain: Vec<String> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    chain.push(peer);

    let index = chain.len().saturating_sub(1 + trusted_hops);
    chain.swap_remove(index)
}
