//! Fixed-window rate limiting keyed by client address.
//!
//! Each key owns a window `{started, count}`. A hit increments the count and
//! the request is rejected once the count exceeds the policy's limit; the
//! window restarts when `now - started >= window`. Windows live in a
//! [`DashMap`] so a hit is atomic under its shard lock.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use inkwell_config::{RateLimitConfig, RateLimitPolicy};
use inkwell_core::AppError;
use tracing::{debug, warn};

use crate::metrics::track_security_rejection;

pub const GLOBAL_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
pub const LOGIN_LIMIT_MESSAGE: &str = "Too many login attempts, please try again in 15 minutes.";

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

static RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
static RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
static RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a single hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed {
        remaining: u32,
        reset_after: Duration,
        window_started: Instant,
    },
    Limited {
        retry_after: Duration,
    },
}

#[derive(Debug)]
pub struct FixedWindowLimiter {
    policy: RateLimitPolicy,
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: DashMap::new(),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    pub fn hit(&self, key: &str) -> Decision {
        self.hit_at(key, Instant::now())
    }

    /// Counts one request for `key` at `now`.
    pub fn hit_at(&self, key: &str, now: Instant) -> Decision {
        let mut window = self.windows.entry(key.to_owned()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(window.started) >= self.policy.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        window.count = window.count.saturating_add(1);

        let reset_after = self
            .policy
            .window
            .saturating_sub(now.saturating_duration_since(window.started));

        if window.count > self.policy.max_requests {
            Decision::Limited {
                retry_after: reset_after,
            }
        } else {
            Decision::Allowed {
                remaining: self.policy.max_requests - window.count,
                reset_after,
                window_started: window.started,
            }
        }
    }

    /// Takes back one hit, provided the window it was counted in is still the
    /// current one for `key`.
    pub fn refund(&self, key: &str, window_started: Instant) {
        if let Some(mut window) = self.windows.get_mut(key)
            && window.started == window_started
        {
            window.count = window.count.saturating_sub(1);
        }
    }

    /// Drops every window that has fully elapsed at `now`.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.windows.len();
        let window = self.policy.window;
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < window);
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

/// The two limiters shared by every request.
#[derive(Debug, Clone)]
pub struct RateLimiters {
    pub global: Arc<FixedWindowLimiter>,
    pub login: Arc<FixedWindowLimiter>,
    pub trust_proxy: bool,
}

impl RateLimiters {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            global: Arc::new(FixedWindowLimiter::new(config.global)),
            login: Arc::new(FixedWindowLimiter::new(config.login)),
            trust_proxy: config.trust_proxy,
        }
    }

    /// Evicts expired windows from both limiters once a minute.
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let limiters = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let now = Instant::now();
                let evicted = limiters.global.sweep_expired(now) + limiters.login.sweep_expired(now);
                if evicted > 0 {
                    debug!(evicted, "Evicted expired rate limit windows");
                }
            }
        })
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_owned)
}

/// Resolves the rate-limit key for a request.
///
/// Behind a trusted proxy the first `X-Forwarded-For` hop wins; otherwise
/// the socket peer address, falling back to `X-Forwarded-For` and finally
/// `"unknown"` when the server was not started with connect info.
pub fn client_key(req: &Request, trust_proxy: bool) -> String {
    if trust_proxy && let Some(ip) = forwarded_for(req.headers()) {
        return ip;
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .or_else(|| forwarded_for(req.headers()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn apply_allowed_headers(
    response: &mut Response,
    policy: RateLimitPolicy,
    remaining: u32,
    reset_after: Duration,
) {
    let headers = response.headers_mut();
    headers.insert(RATE_LIMIT_LIMIT.clone(), HeaderValue::from(policy.max_requests));
    headers.insert(RATE_LIMIT_REMAINING.clone(), HeaderValue::from(remaining));
    headers.insert(RATE_LIMIT_RESET.clone(), HeaderValue::from(ceil_secs(reset_after)));
}

fn limited_response(
    policy: RateLimitPolicy,
    retry_after: Duration,
    message: &'static str,
) -> Response {
    let mut response = AppError::rate_limited(message).into_response();
    let headers = response.headers_mut();
    let retry_secs = ceil_secs(retry_after);
    headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_secs));
    headers.insert(RATE_LIMIT_LIMIT.clone(), HeaderValue::from(policy.max_requests));
    headers.insert(RATE_LIMIT_REMAINING.clone(), HeaderValue::from(0u32));
    headers.insert(RATE_LIMIT_RESET.clone(), HeaderValue::from(retry_secs));
    response
}

/// Counts every request under `/api` against the global policy.
pub async fn global_rate_limit(
    State(limiters): State<RateLimiters>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req, limiters.trust_proxy);
    let policy = limiters.global.policy();

    match limiters.global.hit(&key) {
        Decision::Limited { retry_after } => {
            warn!(client = %key, "Global rate limit exceeded");
            track_security_rejection("rate_limit_global");
            limited_response(policy, retry_after, GLOBAL_LIMIT_MESSAGE)
        }
        Decision::Allowed {
            remaining,
            reset_after,
            ..
        } => {
            let mut response = next.run(req).await;
            apply_allowed_headers(&mut response, policy, remaining, reset_after);
            response
        }
    }
}

/// Counts login attempts; attempts answered with a status below 400 are
/// refunded so only failures use up the budget.
pub async fn login_rate_limit(
    State(limiters): State<RateLimiters>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req, limiters.trust_proxy);
    let policy = limiters.login.policy();

    match limiters.login.hit(&key) {
        Decision::Limited { retry_after } => {
            warn!(client = %key, "Login rate limit exceeded");
            track_security_rejection("rate_limit_login");
            limited_response(policy, retry_after, LOGIN_LIMIT_MESSAGE)
        }
        Decision::Allowed {
            remaining,
            reset_after,
            window_started,
        } => {
            let mut response = next.run(req).await;
            let remaining = if response.status().as_u16() < 400 {
                limiters.login.refund(&key, window_started);
                remaining.saturating_add(1).min(policy.max_requests)
            } else {
                remaining
            };
            apply_allowed_headers(&mut response, policy, remaining, reset_after);
            response
        }
    }
}
