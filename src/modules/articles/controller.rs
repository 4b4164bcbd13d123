use axum::{Json, extract::State, http::StatusCode};
use inkwell_core::{AppError, ErrorResponse};
use tracing::instrument;

use crate::metrics::track_article_created;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, authorize_owner_or_admin, resolve_article_author};
use crate::modules::articles::model::{Article, ArticleDto, ArticleResponse, SearchArticlesDto};
use crate::modules::articles::service::ArticleService;
use crate::modules::auth::model::MessageResponse;
use crate::state::AppState;
use crate::validator::{ValidId, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/articles",
    responses(
        (status = 200, description = "All articles", body = Vec<Article>)
    ),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let articles = ArticleService::list_articles(&state.db).await?;
    Ok(Json(articles))
}

/// Search articles by title
#[utoipa::path(
    post,
    path = "/api/articles/search",
    request_body = SearchArticlesDto,
    responses(
        (status = 200, description = "Matching articles", body = Vec<Article>),
        (status = 403, description = "Invalid or missing CSRF token", body = ErrorResponse),
        (status = 422, description = "Search term too long or contains forbidden characters", body = ErrorResponse)
    ),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn search_articles(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SearchArticlesDto>,
) -> Result<Json<Vec<Article>>, AppError> {
    let articles = ArticleService::search_by_title(&state.db, &dto.title).await?;
    Ok(Json(articles))
}

#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(
        ("id" = i64, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article details", body = Article),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Json<Article>, AppError> {
    let article = ArticleService::get_article(&state.db, id).await?;
    Ok(Json(article))
}

/// Create an article
///
/// The caller must be the submitted author, or an administrator.
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = ArticleDto,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Posting as another author", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Articles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_article(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedJson(dto): ValidatedJson<ArticleDto>,
) -> Result<(StatusCode, Json<ArticleResponse>), AppError> {
    authorize_owner_or_admin(&identity, dto.author_id)?;

    let article = ArticleService::create_article(&state.db, dto).await?;
    track_article_created();

    Ok((
        StatusCode::CREATED,
        Json(ArticleResponse {
            message: "Article created successfully".to_string(),
            article,
        }),
    ))
}

/// Update an article
///
/// Only the author or an administrator may update; only an administrator may
/// reassign the author.
#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(
        ("id" = i64, Path, description = "Article ID")
    ),
    request_body = ArticleDto,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author or an administrator", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Articles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_article(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidId(id): ValidId,
    ValidatedJson(dto): ValidatedJson<ArticleDto>,
) -> Result<Json<ArticleResponse>, AppError> {
    let owner_id = ArticleService::find_author_id(&state.db, id).await?;
    authorize_owner_or_admin(&identity, owner_id)?;

    let author_id = resolve_article_author(&identity, dto.author_id, owner_id);
    let article = ArticleService::update_article(&state.db, id, dto, author_id).await?;

    Ok(Json(ArticleResponse {
        message: "Article updated successfully".to_string(),
        article,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(
        ("id" = i64, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    tag = "Articles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_article(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, AppError> {
    ArticleService::delete_article(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Article deleted successfully")))
}
