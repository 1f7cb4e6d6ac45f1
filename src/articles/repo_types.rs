use sqlx::FromRow;

use crate::auth::repo_types::UserId;

pub type ArticleId = i64;

/// Article record in the database. `author_id` never changes after insert.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub author_id: UserId,
}
