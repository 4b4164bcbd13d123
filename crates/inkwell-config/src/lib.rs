//! # Inkwell Config
//!
//! Configuration types for the Inkwell API, loaded from environment variables
//! (after `dotenvy` has populated them from `.env`).
//!
//! - [`jwt`]: token signing secret and lifetime (the secret is mandatory)
//! - [`cors`]: allowed origins for cross-origin requests
//! - [`csrf`]: anti-forgery cookie settings
//! - [`rate_limit`]: fixed-window limits for the global and login policies
//!
//! Each config exposes `from_env()` plus a `from_source()` variant that takes
//! a lookup closure, so tests never have to mutate the process environment.
//!
//! # Example
//!
//! ```ignore
//! use inkwell_config::{CorsConfig, CsrfConfig, JwtConfig, RateLimitConfig};
//!
//! let jwt_config = JwtConfig::from_env()?; // fails without JWT_SECRET
//! let cors_config = CorsConfig::from_env();
//! let csrf_config = CsrfConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod cors;
pub mod csrf;
pub mod jwt;
pub mod rate_limit;

pub use cors::CorsConfig;
pub use csrf::CsrfConfig;
pub use jwt::JwtConfig;
pub use rate_limit::{RateLimitConfig, RateLimitPolicy};

/// Parses an optional variable, falling back to `default` when it is missing
/// or unparseable.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
