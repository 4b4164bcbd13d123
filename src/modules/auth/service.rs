use inkwell_auth::{Role, issue_token};
use inkwell_config::JwtConfig;
use inkwell_core::{AppError, hash_password, verify_password};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::metrics::{track_jwt_issued, track_login_failure, track_login_success};
use crate::modules::auth::model::{LoginRequest, RegisterRequestDto};
use crate::modules::users::model::User;
use crate::modules::users::service::UserService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Creates a `user`-role account. Email and username must both be unused.
    #[instrument(skip(db))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        Self::create_account(db, dto, Role::User).await
    }

    #[instrument(skip(db))]
    pub async fn create_account(
        db: &PgPool,
        dto: RegisterRequestDto,
        role: Role,
    ) -> Result<User, AppError> {
        if UserService::email_or_username_taken(db, &dto.email, &dto.username).await? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Email or username already in use"
            )));
        }

        let password_hash = hash_password(&dto.password)?;
        let user =
            UserService::create_user(db, &dto.username, &dto.email, &password_hash, role).await?;

        info!(user_id = user.id, role = %user.role, "Account created");
        Ok(user)
    }

    /// Checks the credentials and returns a signed token with the user.
    #[instrument(skip(db, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<(String, User), AppError> {
        let Some(credentials) = UserService::find_credentials_by_email(db, &dto.email).await?
        else {
            warn!("Login attempt for unknown email");
            track_login_failure("unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &credentials.password)? {
            warn!(user_id = credentials.id, "Login attempt with wrong password");
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = credentials.into_user();
        let token = issue_token(&user.identity(), jwt_config).map_err(AppError::internal)?;

        track_jwt_issued();
        track_login_success(user.role.as_str());

        Ok((token, user))
    }
}
