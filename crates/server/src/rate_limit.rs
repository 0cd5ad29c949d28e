use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared_types::AppError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::db::AppState;

/// Sliding window rate limit state shared across requests.
#[derive(Clone)]
pub struct RateLimitState {
    inner: Arc<Mutex<RateLimitInner>>,
}

struct RateLimitInner {
    /// Map from client key -> list of request timestamps.
    requests: HashMap<String, Vec<Instant>>,
    max_requests: u32,
    window: Duration,
    last_sweep: Instant,
}

impl RateLimitState {
    /// Allow `max_requests` per `window` for each key.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimitInner {
                requests: HashMap::new(),
                max_requests,
                window,
                last_sweep: Instant::now(),
            })),
        }
    }

    /// Record an attempt from `key`. Returns false once the window is full.
    /// Successful attempts count too.
    pub fn check(&self, key: &str) -> bool {
        let Ok(mut inner) = self.inner.lock() else {
            return true;
        };
        let now = Instant::now();
        let window = inner.window;
        let max = inner.max_requests;

        if now.duration_since(inner.last_sweep) >= window {
            inner
                .requests
                .retain(|_, ts| ts.iter().any(|t| now.duration_since(*t) < window));
            inner.last_sweep = now;
        }

        let timestamps = inner.requests.entry(key.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < window);

        if timestamps.len() as u32 >= max {
            return false;
        }

        timestamps.push(now);
        true
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.inner.lock().map(|i| i.requests.len()).unwrap_or(0)
    }
}

/// Client key for rate limiting. Forwarded headers are only believed when
/// `trust_proxy` is set; otherwise the socket peer is used, then `local`.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    let forwarded = trust_proxy
        .then(|| {
            headers
                .get("x-forwarded-for")
                .or_else(|| headers.get("x-real-ip"))
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .flatten();
    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "local".to_string())
}

/// Socket peer recorded by the listener, when served with connect info.
pub fn peer_addr(extensions: &axum::http::Extensions) -> Option<SocketAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

/// Middleware for the login route. Rejects with 429 once the caller has
/// used up the per-minute allowance.
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(
        request.headers(),
        peer_addr(request.extensions()),
        state.config.auth.trust_proxy_headers,
    );

    if !state.login_limiter.check(&key) {
        tracing::warn!(client = %key, "Login rate limit exceeded");
        return AppError::rate_limited("Too many login attempts. Please wait a minute and try again.")
            .into_response();
    }

    next.run(request).await
}
