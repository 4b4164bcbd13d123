use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validator::validate_not_blank;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub article_id: i64,
    pub content: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(custom(function = "validate_not_blank", message = "Content is required"))]
    pub content: String,
    /// Must be the caller's own id.
    #[validate(range(min = 1, message = "user_id must be a positive integer"))]
    pub user_id: i64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CommentResponse {
    pub message: String,
    pub comment: Comment,
}
