use inkwell_core::AppError;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::comments::model::Comment;

const COMMENT_COLUMNS: &str = "id, user_id, article_id, content";

fn comment_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Comment not found"))
}

pub struct CommentService;

impl CommentService {
    #[instrument(skip(db))]
    pub async fn list_for_article(db: &PgPool, article_id: i64) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE article_id = $1 ORDER BY id"
        ))
        .bind(article_id)
        .fetch_all(db)
        .await?;

        Ok(comments)
    }

    #[instrument(skip(db))]
    pub async fn get_comment(db: &PgPool, id: i64) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(comment_not_found)
    }

    /// The comment's `user_id`, for ownership checks.
    #[instrument(skip(db))]
    pub async fn find_author_id(db: &PgPool, id: i64) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT user_id AS owner_id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(comment_not_found)
    }

    #[instrument(skip(db))]
    pub async fn create_comment(
        db: &PgPool,
        article_id: i64,
        user_id: i64,
        content: &str,
    ) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (user_id, article_id, content) VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(article_id)
        .bind(content.trim())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::not_found(anyhow::anyhow!("Article not found"));
            }
            AppError::database(e)
        })?;

        Ok(comment)
    }

    #[instrument(skip(db))]
    pub async fn delete_comment(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found());
        }

        Ok(())
    }
}
