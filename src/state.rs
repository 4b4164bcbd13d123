use inkwell_config::{CorsConfig, CsrfConfig, JwtConfig, RateLimitConfig};
use inkwell_db::{PgPool, init_db_pool};

use crate::middleware::rate_limit::RateLimiters;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub csrf_config: CsrfConfig,
    pub rate_limiters: RateLimiters,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        csrf_config: CsrfConfig,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        let rate_limiters = RateLimiters::new(&rate_limit_config);
        Self {
            db,
            jwt_config,
            cors_config,
            csrf_config,
            rate_limiters,
        }
    }
}

/// Reads every configuration section from the environment and connects the
/// pool. A missing `JWT_SECRET` or `DATABASE_URL` is an error.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env()?;
    let db = init_db_pool().await?;

    Ok(AppState::new(
        db,
        jwt_config,
        CorsConfig::from_env(),
        CsrfConfig::from_env(),
        RateLimitConfig::from_env(),
    ))
}
