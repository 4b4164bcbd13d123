//! Rate limiting configuration.
//!
//! Two fixed-window policies are configured, both keyed by client address:
//!
//! - **global**: every request under `/api` counts (default 100 per 15 minutes)
//! - **login**: only `POST /api/auth/login`, and only unsuccessful attempts
//!   count (default 5 per 15 minutes)
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_GLOBAL_MAX`: default 100
//! - `RATE_LIMIT_LOGIN_MAX`: default 5
//! - `RATE_LIMIT_WINDOW_SECS`: window length shared by both policies, default 900
//! - `RATE_LIMIT_TRUST_PROXY`: key clients by the first `X-Forwarded-For` hop
//!   instead of the socket peer address, default `false`

use std::env;
use std::time::Duration;

use crate::parse_or;

pub const DEFAULT_WINDOW_SECS: u64 = 15 * 60;
pub const DEFAULT_GLOBAL_MAX: u32 = 100;
pub const DEFAULT_LOGIN_MAX: u32 = 5;

/// A single fixed-window policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Requests allowed per window; the request that pushes the counter past
    /// this value is rejected.
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub global: RateLimitPolicy,
    pub login: RateLimitPolicy,
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        let window = Duration::from_secs(DEFAULT_WINDOW_SECS);
        Self {
            global: RateLimitPolicy::new(DEFAULT_GLOBAL_MAX, window),
            login: RateLimitPolicy::new(DEFAULT_LOGIN_MAX, window),
            trust_proxy: false,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    #[must_use]
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let window = Duration::from_secs(parse_or(
            &lookup,
            "RATE_LIMIT_WINDOW_SECS",
            DEFAULT_WINDOW_SECS,
        ));

        Self {
            global: RateLimitPolicy::new(
                parse_or(&lookup, "RATE_LIMIT_GLOBAL_MAX", DEFAULT_GLOBAL_MAX),
                window,
            ),
            login: RateLimitPolicy::new(
                parse_or(&lookup, "RATE_LIMIT_LOGIN_MAX", DEFAULT_LOGIN_MAX),
                window,
            ),
            trust_proxy: lookup("RATE_LIMIT_TRUST_PROXY")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        }
    }
}
