//! Identity token configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret (**required**, startup fails without it)
//! - `JWT_EXPIRY`: token lifetime in seconds (default: 43200, i.e. 12 hours)

use std::env;

use anyhow::bail;

use crate::parse_or;

/// Default token lifetime: 12 hours.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 12 * 60 * 60;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_expiry: i64,
}

impl JwtConfig {
    /// Loads the config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when `JWT_SECRET` is unset or blank. This is a
    /// startup precondition: the server must not start without it.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// # Errors
    ///
    /// Returns an error when `JWT_SECRET` is missing or blank.
    pub fn from_source<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ => bail!("JWT_SECRET is not set; refusing to start without a signing secret"),
        };

        Ok(Self {
            secret,
            token_expiry: parse_or(&lookup, "JWT_EXPIRY", DEFAULT_TOKEN_EXPIRY_SECS),
        })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}
