use axum::{Json, extract::State};
use inkwell_core::{AppError, ErrorResponse};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, authorize_owner_or_admin, resolve_role_update};
use crate::modules::auth::model::MessageResponse;
use crate::modules::users::model::{UpdateUserDto, User, UserResponse};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::{ValidId, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::list_users(&state.db).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the account owner or an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidId(id): ValidId,
) -> Result<Json<User>, AppError> {
    authorize_owner_or_admin(&identity, id)?;

    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// Update a user.
///
/// Non-administrators may update their own account but not their role.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid id or malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the account owner, or role change attempted", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidId(id): ValidId,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    authorize_owner_or_admin(&identity, id)?;
    let role = resolve_role_update(&identity, dto.requested_role())?;

    let user = UserService::update_user(&state.db, id, dto, role).await?;

    Ok(Json(UserResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the account owner or an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, AppError> {
    authorize_owner_or_admin(&identity, id)?;

    UserService::delete_user(&state.db, id).await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
