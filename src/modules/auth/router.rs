use axum::{Router, middleware, routing::post};

use crate::middleware::rate_limit::{RateLimiters, login_rate_limit};
use crate::state::AppState;

use super::controller::{login_user, register_user};

pub fn init_auth_router(limiters: RateLimiters) -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route(
            "/login",
            post(login_user).route_layer(middleware::from_fn_with_state(
                limiters,
                login_rate_limit,
            )),
        )
}
