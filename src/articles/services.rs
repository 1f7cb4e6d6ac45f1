use anyhow::anyhow;
use tracing::{info, warn};

use crate::{
    articles::{
        access::authorize_mutation,
        dto::{ArticleForm, Pagination},
        repo::ArticleStore,
        repo_types::{Article, ArticleId, NewArticle},
    },
    auth::{
        repo::UserStore,
        repo_types::{User, UserId},
    },
    db::StoreError,
    error::{Action, AppError},
};

pub async fn list_articles(
    articles: &dyn ArticleStore,
    page: &Pagination,
) -> Result<Vec<Article>, AppError> {
    let (limit, offset) = page.clamped();
    Ok(articles.list(limit, offset).await?)
}

/// The article and its author, looked up through `author_id`.
pub async fn article_with_author(
    articles: &dyn ArticleStore,
    users: &dyn UserStore,
    id: ArticleId,
) -> Result<(Article, User), AppError> {
    let article = articles
        .find_by_id(id)
        .await?
        .ok_or(AppError::PageNotFound)?;
    let author = users
        .find_by_id(article.author_id)
        .await?
        .ok_or_else(|| anyhow!("author {} of article {} missing", article.author_id, id))?;
    Ok((article, author))
}

pub async fn list_own_articles(
    articles: &dyn ArticleStore,
    actor: Option<UserId>,
    action: Action,
) -> Result<Vec<Article>, AppError> {
    let user_id = actor.ok_or(AppError::NotAuthenticated(action))?;
    Ok(articles.list_by_author(user_id).await?)
}

/// Creating needs only an identity; there is no owner to check yet.
pub async fn create_article(
    articles: &dyn ArticleStore,
    author_id: UserId,
    mut form: ArticleForm,
) -> Result<Article, AppError> {
    form.normalize();
    form.validate().map_err(AppError::Validation)?;

    let new_article = NewArticle {
        title: form.title,
        content: form.content,
        author_id,
    };
    match articles.create(new_article).await {
        Ok(article) => {
            info!(article_id = article.id, author_id, "article created");
            Ok(article)
        }
        // the session outlived its user
        Err(StoreError::ForeignKeyViolation(_)) => {
            Err(AppError::NotAuthenticated(Action::AddArticle))
        }
        Err(e) => Err(e.into()),
    }
}

/// Loads an article for mutation, enforcing ownership.
pub async fn load_owned(
    articles: &dyn ArticleStore,
    actor: Option<UserId>,
    id: ArticleId,
    action: Action,
) -> Result<Article, AppError> {
    // anonymous callers never reach the store
    if actor.is_none() {
        return Err(AppError::NotAuthenticated(action));
    }
    let article = articles.find_by_id(id).await?;
    let decision = authorize_mutation(actor, article.as_ref());
    if !decision.is_allowed() {
        warn!(user_id = ?actor, article_id = id, ?decision, %action, "article mutation denied");
    }
    decision.into_result(action)?;
    article.ok_or(AppError::ArticleNotFound)
}

/// Updates title and content of an article in place. Only its author may.
pub async fn edit_article(
    articles: &dyn ArticleStore,
    actor: Option<UserId>,
    id: ArticleId,
    mut form: ArticleForm,
) -> Result<Article, AppError> {
    load_owned(articles, actor, id, Action::EditArticle).await?;
    form.normalize();
    form.validate().map_err(AppError::Validation)?;

    let article = articles
        .update(id, &form.title, &form.content)
        .await?
        .ok_or(AppError::ArticleNotFound)?;
    info!(article_id = id, "article updated");
    Ok(article)
}

pub async fn delete_article(
    articles: &dyn ArticleStore,
    actor: Option<UserId>,
    id: ArticleId,
) -> Result<(), AppError> {
    load_owned(articles, actor, id, Action::DeleteArticle).await?;
    if !articles.delete(id).await? {
        return Err(AppError::ArticleNotFound);
    }
    info!(article_id = id, "article deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        articles::memory::MemoryArticleStore,
        auth::{memory::MemoryUserStore, repo_types::NewUser},
    };

    async fn setup() -> (Arc<MemoryUserStore>, MemoryArticleStore, UserId, UserId) {
        let users = Arc::new(MemoryUserStore::new());
        let a = users.create(new_user("a@example.com")).await.unwrap().id;
        let b = users.create(new_user("b@example.com")).await.unwrap().id;
        let articles = MemoryArticleStore::new(users.clone());
        (users, articles, a, b)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            name: "Name".into(),
            surname: "Surname".into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    fn form(title: &str, content: &str) -> ArticleForm {
        ArticleForm {
            title: title.into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn only_the_author_can_delete() {
        let (_, articles, a, b) = setup().await;
        let x = create_article(&articles, a, form("X", "body")).await.unwrap();

        let err = delete_article(&articles, Some(b), x.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotOwner(Action::DeleteArticle)));
        assert!(articles.find_by_id(x.id).await.unwrap().is_some());

        delete_article(&articles, Some(a), x.id).await.unwrap();
        let err = load_owned(&articles, Some(a), x.id, Action::EditArticle)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ArticleNotFound));
    }

    #[tokio::test]
    async fn anonymous_edit_is_not_authenticated() {
        let (_, articles, a, _) = setup().await;
        let x = create_article(&articles, a, form("X", "body")).await.unwrap();

        let err = edit_article(&articles, None, x.id, form("new", "new"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated(Action::EditArticle)));

        let err = edit_article(&articles, None, 999, form("new", "new"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated(Action::EditArticle)));
    }

    #[tokio::test]
    async fn edit_mutates_in_place() {
        let (_, articles, a, b) = setup().await;
        let x = create_article(&articles, a, form("Old", "old body")).await.unwrap();

        let edited = edit_article(&articles, Some(a), x.id, form(" New ", "new body"))
            .await
            .unwrap();
        assert_eq!(edited.id, x.id);
        assert_eq!(edited.title, "New");
        assert_eq!(edited.author_id, a);
        assert_eq!(articles.list(100, 0).await.unwrap().len(), 1);

        let err = edit_article(&articles, Some(b), x.id, form("Hijack", "mine"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotOwner(Action::EditArticle)));
        assert_eq!(articles.find_by_id(x.id).await.unwrap().unwrap().title, "New");
    }

    #[tokio::test]
    async fn denied_edit_does_not_validate_the_form() {
        let (_, articles, a, b) = setup().await;
        let x = create_article(&articles, a, form("X", "body")).await.unwrap();
        let err = edit_article(&articles, Some(b), x.id, form("", "")).await.unwrap_err();
        assert!(matches!(err, AppError::NotOwner(_)));
    }

    #[tokio::test]
    async fn create_requires_a_valid_form() {
        let (_, articles, a, _) = setup().await;
        let err = create_article(&articles, a, form("", "body")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(articles.list(100, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_for_vanished_user_is_not_authenticated() {
        let (_, articles, _, _) = setup().await;
        let err = create_article(&articles, 404, form("X", "body"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated(Action::AddArticle)));
    }

    #[tokio::test]
    async fn article_page_resolves_author_explicitly() {
        let (users, articles, a, _) = setup().await;
        let x = create_article(&articles, a, form("X", "body")).await.unwrap();

        let (article, author) = article_with_author(&articles, &*users, x.id)
            .await
            .unwrap();
        assert_eq!(article, x);
        assert_eq!(author.id, a);

        let err = article_with_author(&articles, &*users, 999)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PageNotFound));
    }

    #[tokio::test]
    async fn own_articles_are_filtered_and_newest_first() {
        let (_, articles, a, b) = setup().await;
        create_article(&articles, a, form("first", "1")).await.unwrap();
        create_article(&articles, b, form("other", "2")).await.unwrap();
        create_article(&articles, a, form("second", "3")).await.unwrap();

        let own = list_own_articles(&articles, Some(a), Action::ViewArticles)
            .await
            .unwrap();
        let titles: Vec<_> = own.iter().map(|x| x.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);

        let err = list_own_articles(&articles, None, Action::ViewArticles)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated(Action::ViewArticles)));
    }

    #[tokio::test]
    async fn index_is_paginated() {
        let (_, articles, a, _) = setup().await;
        for i in 0..5 {
            create_article(&articles, a, form(&format!("t{i}"), "c")).await.unwrap();
        }
        let page = Pagination { limit: 2, offset: 1 };
        let titles: Vec<_> = list_articles(&articles, &page)
            .await
            .unwrap()
            .into_iter()
            .map(|x| x.title)
            .collect();
        assert_eq!(titles, vec!["t3", "t2"]);
    }
}
