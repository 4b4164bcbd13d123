use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validator::{validate_not_blank, validate_search_term};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// Body of both article creation and article update.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ArticleDto {
    #[validate(
        length(max = 255, message = "Title must be between 1 and 255 characters"),
        custom(function = "validate_not_blank", message = "Title must be between 1 and 255 characters")
    )]
    pub title: String,
    #[validate(custom(function = "validate_not_blank", message = "Content is required"))]
    pub content: String,
    /// On update, ignored unless the caller is an administrator.
    #[validate(range(min = 1, message = "author_id must be a positive integer"))]
    pub author_id: i64,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct SearchArticlesDto {
    #[serde(default)]
    #[validate(
        length(max = 100, message = "Search cannot exceed 100 characters"),
        custom(function = "validate_search_term")
    )]
    pub title: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ArticleResponse {
    pub message: String,
    pub article: Article,
}
