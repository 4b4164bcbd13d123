use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_comment, delete_comment, get_comment, list_article_comments};

/// Mounted under `/articles/{id}/comments`.
pub fn init_article_comments_router() -> Router<AppState> {
    Router::new().route("/", get(list_article_comments).post(create_comment))
}

pub fn init_comments_router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_comment).delete(delete_comment))
}
