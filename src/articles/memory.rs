//! In-memory article store for tests. Checks the author reference against a
//! `MemoryUserStore` the way the database foreign key would.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    repo::ArticleStore,
    repo_types::{Article, ArticleId, NewArticle},
};
use crate::{
    auth::{memory::MemoryUserStore, repo_types::UserId},
    db::{StoreError, StoreResult},
};

pub struct MemoryArticleStore {
    users: Arc<MemoryUserStore>,
    articles: RwLock<BTreeMap<ArticleId, Article>>,
    // ids are never reused, like a BIGSERIAL
    last_id: AtomicI64,
}

impl MemoryArticleStore {
    pub fn new(users: Arc<MemoryUserStore>) -> Self {
        Self {
            users,
            articles: RwLock::new(BTreeMap::new()),
            last_id: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn create(&self, article: NewArticle) -> StoreResult<Article> {
        if !self.users.exists(article.author_id).await {
            return Err(StoreError::ForeignKeyViolation(
                "articles_author_id_fkey".into(),
            ));
        }
        let mut articles = self.articles.write().await;
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let article = Article {
            id,
            title: article.title,
            content: article.content,
            author_id: article.author_id,
        };
        articles.insert(id, article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>> {
        Ok(self.articles.read().await.get(&id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Article>> {
        let articles = self.articles.read().await;
        Ok(articles
            .values()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_by_author(&self, author_id: UserId) -> StoreResult<Vec<Article>> {
        let articles = self.articles.read().await;
        Ok(articles
            .values()
            .rev()
            .filter(|a| a.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: ArticleId,
        title: &str,
        content: &str,
    ) -> StoreResult<Option<Article>> {
        let mut articles = self.articles.write().await;
        Ok(articles.get_mut(&id).map(|a| {
            a.title = title.to_string();
            a.content = content.to_string();
            a.clone()
        }))
    }

    async fn delete(&self, id: ArticleId) -> StoreResult<bool> {
        Ok(self.articles.write().await.remove(&id).is_some())
    }
}
