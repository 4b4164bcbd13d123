use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use inkwell_auth::{Identity, verify_token};
use inkwell_core::AppError;
use tracing::debug;

use crate::metrics::track_security_rejection;
use crate::state::AppState;

/// Extractor that verifies the bearer token and yields the caller's identity.
///
/// Every failure (missing header, wrong scheme, bad signature, expired or
/// malformed token) is a `401`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                track_security_rejection("unauthenticated");
                AppError::unauthorized("Missing authorization header")
            })?;

        let token = bearer_token(auth_header).ok_or_else(|| {
            track_security_rejection("unauthenticated");
            AppError::unauthorized("Invalid authorization header format")
        })?;

        let identity = verify_token(token, &state.jwt_config).map_err(|err| {
            debug!(error = %err, "Token rejected");
            track_security_rejection("unauthenticated");
            AppError::unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("bearer abc"), None);
    }
}
