use axum::http::{HeaderName, HeaderValue, Method, header};
use anyhow::anyhow;
use axum::{Json, Router, middleware, routing::get};
use inkwell_config::csrf::CSRF_HEADER_NAME;
use inkwell_core::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_app, metrics_middleware};
use crate::middleware::csrf::csrf_protection;
use crate::middleware::rate_limit::global_rate_limit;
use crate::middleware::security_headers::with_security_headers;
use crate::modules::articles::router::init_articles_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::comments::router::init_comments_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let csrf_header = HeaderName::from_static(CSRF_HEADER_NAME);

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            csrf_header.clone(),
        ])
        .expose_headers([csrf_header])
        .allow_credentials(true)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn api_not_found() -> AppError {
    AppError::not_found(anyhow!("Not found"))
}

/// Routes under `/api`. CSRF runs first, then the global rate limit, so a
/// request failing the CSRF check is not counted. Unmatched paths go through
/// the same layers.
fn api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", init_auth_router(state.rate_limiters.clone()))
        .nest("/users", init_users_router())
        .nest("/articles", init_articles_router())
        .nest("/comments", init_comments_router())
        .fallback(api_not_found)
        .layer(middleware::from_fn_with_state(
            state.rate_limiters.clone(),
            global_rate_limit,
        ))
        .layer(middleware::from_fn_with_state(
            state.csrf_config.clone(),
            csrf_protection,
        ))
}

pub fn init_router(state: AppState) -> Router {
    init_router_with_metrics(state, None)
}

pub fn init_router_with_metrics(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api_router(&state))
        .with_state(state.clone());

    if let Some(handle) = metrics {
        router = router.merge(metrics_app(handle));
    }

    with_security_headers(router.layer(cors_layer(&state)))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
