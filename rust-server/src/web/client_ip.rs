//! Client address extraction.
//!
//! The service normally sits behind a reverse proxy, which carries the real
//! client address in `X-Forwarded-For`. The first hop in that header wins;
//! the socket peer address is the fallback for direct connections. The
//! resulting address is advisory: it feeds the rate limiter and the stored
//! row, nothing security-critical.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

/// Resolve the client IP for a request.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
        .unwrap_or_else(|| peer.ip())
}
