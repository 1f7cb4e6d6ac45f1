use serde::{Deserialize, Serialize};

use crate::{
    articles::repo_types::{Article, ArticleId},
    auth::repo_types::{User, UserId},
    error::FieldError,
};

const MAX_TITLE_LEN: usize = 100;

/// Title/content body shared by the add and edit forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl ArticleForm {
    /// Trims the title. Content is stored as typed.
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.title.is_empty() {
            errors.push(FieldError::new("title", "Title is required."));
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            errors.push(FieldError::new(
                "title",
                format!("Must be at most {MAX_TITLE_LEN} characters."),
            ));
        }
        if self.content.trim().is_empty() {
            errors.push(FieldError::new("content", "Content is required."));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Body of `POST /profile/article_editor`, which names the article in the form.
#[derive(Debug, Default, Deserialize)]
pub struct EditorForm {
    pub article_id: Option<ArticleId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl EditorForm {
    pub fn into_parts(self) -> (Option<ArticleId>, ArticleForm) {
        (
            self.article_id,
            ArticleForm {
                title: self.title,
                content: self.content,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub title: String,
    pub author_id: UserId,
}

impl From<Article> for ArticleSummary {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            author_id: a.author_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
}

impl From<Article> for ArticleDetail {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorView {
    pub id: UserId,
    pub name: String,
    pub surname: String,
}

impl From<User> for AuthorView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            surname: u.surname,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub articles: Vec<ArticleSummary>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct ArticleView {
    pub article: ArticleDetail,
    pub author: AuthorView,
}

#[derive(Debug, Serialize)]
pub struct UserArticlesView {
    pub articles: Vec<ArticleSummary>,
}

impl UserArticlesView {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles: articles.into_iter().map(ArticleSummary::from).collect(),
        }
    }
}

/// Editor prefilled with the article being changed.
#[derive(Debug, Serialize)]
pub struct EditorView {
    pub action: String,
    pub article: ArticleDetail,
}

impl From<Article> for EditorView {
    fn from(a: Article) -> Self {
        Self {
            action: format!("/edit_article/{}", a.id),
            article: a.into(),
        }
    }
}
