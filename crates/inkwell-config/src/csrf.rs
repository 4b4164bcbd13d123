//! Anti-forgery cookie settings.
//!
//! - `APP_ENV`: when `production`, the CSRF cookie carries the `Secure` flag
//! - `CSRF_TOKEN_TTL`: cookie lifetime in seconds (default: 3600)

use std::env;

use crate::parse_or;

pub const CSRF_COOKIE_NAME: &str = "csrf-token";
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";
pub const DEFAULT_CSRF_TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfConfig {
    pub secure_cookie: bool,
    pub token_ttl: i64,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            secure_cookie: false,
            token_ttl: DEFAULT_CSRF_TOKEN_TTL_SECS,
        }
    }
}

impl CsrfConfig {
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secure_cookie: lookup("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            token_ttl: parse_or(&lookup, "CSRF_TOKEN_TTL", DEFAULT_CSRF_TOKEN_TTL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_only_in_production() {
        let dev = CsrfConfig::from_source(|_| None);
        assert!(!dev.secure_cookie);
        assert_eq!(dev.token_ttl, 3600);

        let prod = CsrfConfig::from_source(|key| {
            (key == "APP_ENV").then(|| "Production".to_string())
        });
        assert!(prod.secure_cookie);
    }
}
