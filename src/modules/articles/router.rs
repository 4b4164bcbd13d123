use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::comments::router::init_article_comments_router;
use crate::state::AppState;

use super::controller::{
    create_article, delete_article, get_article, list_articles, search_articles, update_article,
};

pub fn init_articles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_articles).post(create_article))
        .route("/search", post(search_articles))
        .route(
            "/{id}",
            get(get_article).put(update_article).delete(delete_article),
        )
        .nest("/{id}/comments", init_article_comments_router())
}
