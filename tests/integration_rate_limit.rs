mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{body_json, test_app_with_rate_limit, with_csrf};
use inkwell_auth::Role;
use inkwell_config::{RateLimitConfig, RateLimitPolicy};
use serde_json::json;
use tower::ServiceExt;

const WINDOW: Duration = Duration::from_secs(15 * 60);

fn config(global_max: u32, login_max: u32) -> RateLimitConfig {
    RateLimitConfig {
        global: RateLimitPolicy::new(global_max, WINDOW),
        login: RateLimitPolicy::new(login_max, WINDOW),
        trust_proxy: true,
    }
}

fn get_users(ip: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/users")
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

fn failed_login(ip: &str) -> Request<Body> {
    with_csrf(Request::builder())
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(
            json!({ "email": "not-an-email", "password": "" }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_global_limit_rejects_request_past_max() {
    let app = test_app_with_rate_limit(config(100, 5));

    for i in 0..100 {
        let response = app.clone().oneshot(get_users("10.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "request {i}");
    }

    let response = app.oneshot(get_users("10.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= WINDOW.as_secs());

    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Too many requests from this IP, please try again later."
    );
}

#[tokio::test]
async fn test_allowed_responses_carry_rate_limit_headers() {
    let app = test_app_with_rate_limit(config(3, 5));

    let response = app.clone().oneshot(get_users("10.0.0.2")).await.unwrap();
    assert_eq!(response.headers().get("ratelimit-limit").unwrap(), "3");
    assert_eq!(response.headers().get("ratelimit-remaining").unwrap(), "2");
    assert!(response.headers().contains_key("ratelimit-reset"));
}

#[tokio::test]
async fn test_clients_have_separate_windows() {
    let app = test_app_with_rate_limit(config(1, 5));

    let first = app.clone().oneshot(get_users("10.0.0.3")).await.unwrap();
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

    let second = app.clone().oneshot(get_users("10.0.0.3")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let other = app.oneshot(get_users("10.0.0.4")).await.unwrap();
    assert_eq!(other.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_routes_outside_api_not_limited() {
    let app = test_app_with_rate_limit(config(1, 5));

    for _ in 0..3 {
        let request = Request::builder()
            .uri("/health")
            .header("x-forwarded-for", "10.0.0.5")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_sixth_failed_login_is_rejected() {
    let app = test_app_with_rate_limit(config(100, 5));

    for i in 0..5 {
        let response = app.clone().oneshot(failed_login("10.0.1.1")).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "attempt {i}"
        );
    }

    let response = app.clone().oneshot(failed_login("10.0.1.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));

    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Too many login attempts, please try again in 15 minutes."
    );

    // the login budget does not affect other routes
    let response = app.oneshot(get_users("10.0.1.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_limit_only_applies_to_login() {
    let app = test_app_with_rate_limit(config(100, 1));

    for _ in 0..3 {
        let request = with_csrf(Request::builder())
            .method("POST")
            .uri("/api/auth/register")
            .header("content-type", "application/json")
            .header("x-forwarded-for", "10.0.1.2")
            .body(Body::from(
                json!({ "username": "x", "email": "bad", "password": "1" }).to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_csrf_rejections_are_not_counted() {
    let app = test_app_with_rate_limit(config(2, 5));

    for _ in 0..5 {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/articles/1")
            .header("authorization", common::bearer(1, Role::Admin))
            .header("x-forwarded-for", "10.0.1.3")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let response = app.oneshot(get_users("10.0.1.3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_api_paths_are_counted() {
    let app = test_app_with_rate_limit(config(1, 5));
    let unknown = || {
        Request::builder()
            .uri("/api/unknown")
            .header("x-forwarded-for", "10.0.0.9")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(unknown()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-csrf-token"));
    assert_eq!(response.headers().get("ratelimit-remaining").unwrap(), "0");

    let response = app.oneshot(unknown()).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
