//! `create-admin` command: bootstraps an administrator account.
//!
//! ```bash
//! inkwell create-admin <username> <email> <password>
//! ```

use anyhow::anyhow;
use inkwell_auth::Role;
use inkwell_core::AppError;
use sqlx::PgPool;
use validator::Validate;

use crate::modules::auth::model::RegisterRequestDto;
use crate::modules::auth::service::AuthService;
use crate::modules::users::model::User;

pub const CREATE_ADMIN_COMMAND: &str = "create-admin";

/// Parses `<program> create-admin <username> <email> <password>`.
pub fn parse_create_admin_args(args: &[String]) -> Result<RegisterRequestDto, String> {
    match args {
        [_, command, username, email, password] if command == CREATE_ADMIN_COMMAND => {
            Ok(RegisterRequestDto {
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
            })
        }
        _ => Err(format!(
            "Usage: {} {CREATE_ADMIN_COMMAND} <username> <email> <password>",
            args.first().map(String::as_str).unwrap_or("inkwell")
        )),
    }
}

/// Creates an `admin`-role account after applying the registration rules.
pub async fn create_admin(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
    dto.validate()
        .map_err(|errors| AppError::unprocessable(anyhow!("{errors}")))?;

    AuthService::create_account(db, dto, Role::Admin).await
}
