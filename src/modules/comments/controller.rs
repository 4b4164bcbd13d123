use axum::{Json, extract::State, http::StatusCode};
use inkwell_core::{AppError, ErrorResponse};
use tracing::instrument;

use crate::metrics::track_comment_created;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{authorize_owner_or_admin, authorize_self};
use crate::modules::auth::model::MessageResponse;
use crate::modules::comments::model::{Comment, CommentResponse, CreateCommentDto};
use crate::modules::comments::service::CommentService;
use crate::state::AppState;
use crate::validator::{ValidId, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/articles/{id}/comments",
    params(
        ("id" = i64, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Comments on the article", body = Vec<Comment>),
        (status = 400, description = "Invalid id", body = ErrorResponse)
    ),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn list_article_comments(
    State(state): State<AppState>,
    ValidId(article_id): ValidId,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = CommentService::list_for_article(&state.db, article_id).await?;
    Ok(Json(comments))
}

/// Comment on an article
///
/// `user_id` must be the caller's own id; administrators cannot comment on
/// behalf of others.
#[utoipa::path(
    post,
    path = "/api/articles/{id}/comments",
    params(
        ("id" = i64, Path, description = "Article ID")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Commenting as another user", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidId(article_id): ValidId,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    authorize_self(&identity, dto.user_id)?;

    let comment =
        CommentService::create_comment(&state.db, article_id, dto.user_id, &dto.content).await?;
    track_comment_created();

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "Comment added to article".to_string(),
            comment,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/comments/{id}",
    params(
        ("id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment details", body = Comment),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn get_comment(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Json<Comment>, AppError> {
    let comment = CommentService::get_comment(&state.db, id).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(
        ("id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the comment author or an administrator", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, AppError> {
    let owner_id = CommentService::find_author_id(&state.db, id).await?;
    authorize_owner_or_admin(&identity, owner_id)?;

    CommentService::delete_comment(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}
