use inkwell_auth::Role;
use inkwell_core::{AppError, hash_password};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::users::model::{UpdateUserDto, User, UserCredentials};

const USER_COLUMNS: &str = "id, username, email, role";

fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow::anyhow!("Email or username already in use"));
    }
    AppError::database(e)
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, password_hash))]
    pub async fn create_user(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, role) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(db)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn email_or_username_taken(
        db: &PgPool,
        email: &str,
        username: &str,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)",
        )
        .bind(email)
        .bind(username)
        .fetch_one(db)
        .await?;

        Ok(taken)
    }

    #[instrument(skip(db))]
    pub async fn find_credentials_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, email, password, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(credentials)
    }

    #[instrument(skip(db))]
    pub async fn list_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(db)
                .await?;

        Ok(users)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    /// Writes the fields present in `dto`; `role = None` keeps the stored role.
    #[instrument(skip(db))]
    pub async fn update_user(
        db: &PgPool,
        id: i64,
        dto: UpdateUserDto,
        role: Option<Role>,
    ) -> Result<User, AppError> {
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET username = COALESCE($1, username),
                   email = COALESCE($2, email),
                   password = COALESCE($3, password),
                   role = COALESCE($4, role)
               WHERE id = $5
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(dto.username)
        .bind(dto.email)
        .bind(password_hash)
        .bind(role.map(|role| role.as_str()))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }

        Ok(())
    }
}
