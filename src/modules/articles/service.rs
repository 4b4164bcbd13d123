use inkwell_core::AppError;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::articles::model::{Article, ArticleDto};

const ARTICLE_COLUMNS: &str = "id, title, content, author_id";

/// Escapes `LIKE` wildcards so the term only ever matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn article_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Article not found"))
}

pub struct ArticleService;

impl ArticleService {
    #[instrument(skip(db))]
    pub async fn list_articles(db: &PgPool) -> Result<Vec<Article>, AppError> {
        let articles = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY id"
        ))
        .fetch_all(db)
        .await?;

        Ok(articles)
    }

    /// Substring match on the title. The term is bound as a parameter.
    #[instrument(skip(db))]
    pub async fn search_by_title(db: &PgPool, title: &str) -> Result<Vec<Article>, AppError> {
        let articles = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE title LIKE $1 ESCAPE '\\' ORDER BY id"
        ))
        .bind(format!("%{}%", escape_like(title.trim())))
        .fetch_all(db)
        .await?;

        Ok(articles)
    }

    #[instrument(skip(db))]
    pub async fn get_article(db: &PgPool, id: i64) -> Result<Article, AppError> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(article_not_found)
    }

    /// The article's `author_id`, for ownership checks.
    #[instrument(skip(db))]
    pub async fn find_author_id(db: &PgPool, id: i64) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT author_id AS owner_id FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(article_not_found)
    }

    #[instrument(skip(db))]
    pub async fn create_article(db: &PgPool, dto: ArticleDto) -> Result<Article, AppError> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "INSERT INTO articles (title, content, author_id) VALUES ($1, $2, $3) RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(dto.content.trim())
        .bind(dto.author_id)
        .fetch_one(db)
        .await?;

        Ok(article)
    }

    #[instrument(skip(db))]
    pub async fn update_article(
        db: &PgPool,
        id: i64,
        dto: ArticleDto,
        author_id: i64,
    ) -> Result<Article, AppError> {
        sqlx::query_as::<_, Article>(&format!(
            r#"UPDATE articles
               SET title = $1, content = $2, author_id = $3
               WHERE id = $4
               RETURNING {ARTICLE_COLUMNS}"#
        ))
        .bind(dto.title.trim())
        .bind(dto.content.trim())
        .bind(author_id)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(article_not_found)
    }

    #[instrument(skip(db))]
    pub async fn delete_article(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(article_not_found());
        }

        Ok(())
    }
}
