//! Double-submit CSRF protection.
//!
//! Every response under `/api` carries a freshly generated token twice: in
//! the `csrf-token` cookie (`HttpOnly`, `SameSite=Strict`) and in the
//! `X-CSRF-Token` header. A state-changing request must echo the token in the
//! `x-csrf-token` header, and that value must equal the cookie the browser
//! sends back. GET, HEAD and OPTIONS are never checked.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use inkwell_config::CsrfConfig;
use inkwell_config::csrf::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
use inkwell_core::AppError;
use rand::RngCore;
use tracing::warn;

use crate::metrics::track_security_rejection;

const TOKEN_BYTES: usize = 32;

/// 32 random bytes, hex encoded.
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Checks the header token against the cookie token for unsafe methods.
pub fn verify_csrf(method: &Method, headers: &HeaderMap) -> Result<(), AppError> {
    if is_safe_method(method) {
        return Ok(());
    }

    let header_token = headers
        .get(CSRF_HEADER_NAME)
        .and_then(|value| value.to_str().ok());
    let jar = CookieJar::from_headers(headers);
    let cookie_token = jar.get(CSRF_COOKIE_NAME).map(|cookie| cookie.value());

    match (header_token, cookie_token) {
        (Some(header_token), Some(cookie_token))
            if !header_token.is_empty() && header_token == cookie_token =>
        {
            Ok(())
        }
        _ => Err(AppError::csrf_mismatch()),
    }
}

fn attach_token(response: &mut Response, token: &str, config: &CsrfConfig) {
    let cookie = Cookie::build((CSRF_COOKIE_NAME, token.to_owned()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(config.token_ttl))
        .secure(config.secure_cookie)
        .build();

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        headers.append(header::SET_COOKIE, value);
    }
    if let Ok(value) = HeaderValue::from_str(token) {
        headers.insert(CSRF_HEADER_NAME, value);
    }
}

pub async fn csrf_protection(
    State(config): State<CsrfConfig>,
    req: Request,
    next: Next,
) -> Response {
    let token = generate_csrf_token();

    let mut response = match verify_csrf(req.method(), req.headers()) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            warn!(method = %req.method(), path = %req.uri().path(), "CSRF check failed");
            track_security_rejection("csrf");
            err.into_response()
        }
    };

    attach_token(&mut response, &token, &config);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(header_token: Option<&str>, cookie_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = header_token {
            headers.insert(CSRF_HEADER_NAME, HeaderValue::from_str(token).unwrap());
        }
        if let Some(token) = cookie_token {
            headers.insert(
                header::COOKIE,
                HeaderValue::from_str(&format!("{CSRF_COOKIE_NAME}={token}")).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn test_token_shape() {
        let token = generate_csrf_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_csrf_token());
    }

    #[test]
    fn test_safe_methods_always_pass() {
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            assert!(verify_csrf(&method, &HeaderMap::new()).is_ok());
            assert!(verify_csrf(&method, &headers(Some("a"), Some("b"))).is_ok());
        }
    }

    #[test]
    fn test_unsafe_methods_require_matching_tokens() {
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(verify_csrf(&method, &headers(Some("abc"), Some("abc"))).is_ok());
            assert!(verify_csrf(&method, &headers(Some("abc"), Some("abd"))).is_err());
            assert!(verify_csrf(&method, &headers(Some("abc"), None)).is_err());
            assert!(verify_csrf(&method, &headers(None, Some("abc"))).is_err());
            assert!(verify_csrf(&method, &HeaderMap::new()).is_err());
        }
    }

    #[test]
    fn test_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_HEADER_NAME, HeaderValue::from_static("tok"));
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; csrf-token=tok; lang=en"),
        );
        assert!(verify_csrf(&Method::POST, &headers).is_ok());
    }

    #[test]
    fn test_attach_token_sets_cookie_and_header() {
        let mut response = Response::new(axum::body::Body::empty());
        let config = CsrfConfig {
            secure_cookie: true,
            token_ttl: 3600,
        };
        attach_token(&mut response, "deadbeef", &config);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("csrf-token=deadbeef"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("Secure"));
        assert_eq!(response.headers().get(CSRF_HEADER_NAME).unwrap(), "deadbeef");
    }
}
