use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    articles::repo_types::{Article, ArticleId, NewArticle},
    auth::repo_types::UserId,
    db::StoreResult,
};

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Fails with `StoreError::ForeignKeyViolation` when the author does not exist.
    async fn create(&self, article: NewArticle) -> StoreResult<Article>;

    async fn find_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>>;

    /// Newest first.
    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Article>>;

    /// Newest first.
    async fn list_by_author(&self, author_id: UserId) -> StoreResult<Vec<Article>>;

    /// Replaces title and content in place. `None` if the article is gone.
    async fn update(
        &self,
        id: ArticleId,
        title: &str,
        content: &str,
    ) -> StoreResult<Option<Article>>;

    /// `false` if there was nothing to delete.
    async fn delete(&self, id: ArticleId) -> StoreResult<bool>;
}

pub struct PgArticleStore {
    db: PgPool,
}

impl PgArticleStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn create(&self, article: NewArticle) -> StoreResult<Article> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, content, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, author_id
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.author_id)
        .fetch_one(&self.db)
        .await?;
        Ok(article)
    }

    async fn find_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, author_id
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(article)
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Article>> {
        let rows = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, author_id
            FROM articles
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_by_author(&self, author_id: UserId) -> StoreResult<Vec<Article>> {
        let rows = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, author_id
            FROM articles
            WHERE author_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        id: ArticleId,
        title: &str,
        content: &str,
    ) -> StoreResult<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
               SET title = $2, content = $3
             WHERE id = $1
            RETURNING id, title, content, author_id
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_optional(&self.db)
        .await?;
        Ok(article)
    }

    async fn delete(&self, id: ArticleId) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
