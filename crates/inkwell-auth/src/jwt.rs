//! Token issuing and verification.
//!
//! Tokens are HS256 JWTs. Expiry is checked against an explicit clock value
//! rather than the library's internal clock so both sides of the boundary can
//! be tested deterministically: a token is expired when `exp < now`.

use chrono::Utc;
use inkwell_config::JwtConfig;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use crate::claims::Claims;
use crate::identity::Identity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Token is malformed")]
    Malformed,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // exp is compared against the caller-supplied clock in decode_claims_at
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);
    validation
}

pub fn issue_token(identity: &Identity, config: &JwtConfig) -> Result<String, TokenError> {
    issue_token_at(identity, config, Utc::now().timestamp())
}

/// Signs `{id, role}` with `iat = now` and `exp = now + token_expiry`.
pub fn issue_token_at(
    identity: &Identity,
    config: &JwtConfig,
    now: i64,
) -> Result<String, TokenError> {
    let claims = Claims {
        id: identity.id,
        role: identity.role,
        iat: now,
        exp: now + config.token_expiry,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verifies the signature and expiry of `token` at time `now` and returns
/// its claims.
pub fn decode_claims_at(token: &str, config: &JwtConfig, now: i64) -> Result<Claims, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation(),
    )?;

    if data.claims.exp < now {
        return Err(TokenError::Expired);
    }

    Ok(data.claims)
}

pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Identity, TokenError> {
    verify_token_at(token, config, Utc::now().timestamp())
}

pub fn verify_token_at(token: &str, config: &JwtConfig, now: i64) -> Result<Identity, TokenError> {
    decode_claims_at(token, config, now).map(|claims| claims.identity())
}
