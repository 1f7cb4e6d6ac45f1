use axum::{
    extract::{
        rejection::{FormRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Response,
    routing::{get, post},
    Form, Router,
};
use tracing::instrument;

use crate::{
    articles::{
        dto::{
            ArticleForm, ArticleSummary, ArticleView, EditorForm, EditorView, IndexView,
            Pagination, UserArticlesView,
        },
        repo_types::ArticleId,
        services::{
            article_with_author, create_article, delete_article, edit_article, list_articles,
            list_own_articles, load_owned,
        },
    },
    auth::extractors::CurrentUser,
    error::{form_or_empty, Action, AppError, FieldError},
    flash::{redirect_with, Flash, IncomingFlash},
    pages::{FormView, Page},
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/article/:id", get(show))
}

pub fn author_routes() -> Router<AppState> {
    Router::new()
        .route("/article_adder", get(adder_page).post(add))
        .route("/add_article", post(add))
        .route("/profile/article_editor", get(editor_index).post(editor_submit))
        .route("/user_articles", get(user_articles))
        .route("/delete_article/:id", post(delete))
        .route("/edit_article/:id", get(edit_page).post(edit))
}

#[instrument(skip(state, query, flash))]
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
    flash: IncomingFlash,
) -> Result<Page<IndexView>, AppError> {
    let Query(page) = query?;
    let articles = list_articles(state.articles.as_ref(), &page).await?;
    let (limit, offset) = page.clamped();
    let view = IndexView {
        articles: articles.into_iter().map(ArticleSummary::from).collect(),
        limit,
        offset,
    };
    Ok(Page::new(flash, view))
}

#[instrument(skip(state, path, flash))]
pub async fn show(
    State(state): State<AppState>,
    path: Result<Path<ArticleId>, PathRejection>,
    flash: IncomingFlash,
) -> Result<Page<ArticleView>, AppError> {
    let Path(id) = path?;
    let (article, author) =
        article_with_author(state.articles.as_ref(), state.users.as_ref(), id).await?;
    let view = ArticleView {
        article: article.into(),
        author: author.into(),
    };
    Ok(Page::new(flash, view))
}

pub async fn adder_page(
    CurrentUser(actor): CurrentUser,
    flash: IncomingFlash,
) -> Result<Page<FormView>, AppError> {
    actor.ok_or(AppError::NotAuthenticated(Action::AddArticle))?;
    Ok(Page::new(flash, FormView::ARTICLE))
}

#[instrument(skip(state, current, form))]
pub async fn add(
    State(state): State<AppState>,
    current: CurrentUser,
    form: Result<Form<ArticleForm>, FormRejection>,
) -> Result<Response, AppError> {
    let author_id = current.require(Action::AddArticle)?;
    create_article(state.articles.as_ref(), author_id, form_or_empty(form)).await?;
    Ok(redirect_with("/", Flash::ArticleCreated))
}

#[instrument(skip(state, flash))]
pub async fn user_articles(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    flash: IncomingFlash,
) -> Result<Page<UserArticlesView>, AppError> {
    let own = list_own_articles(state.articles.as_ref(), actor, Action::ViewArticles).await?;
    Ok(Page::new(flash, UserArticlesView::new(own)))
}

#[instrument(skip(state, flash))]
pub async fn editor_index(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    flash: IncomingFlash,
) -> Result<Page<UserArticlesView>, AppError> {
    let own = list_own_articles(state.articles.as_ref(), actor, Action::EditArticle).await?;
    Ok(Page::new(flash, UserArticlesView::new(own)))
}

/// Same edit as `POST /edit_article/:id`, with the id carried in the form.
#[instrument(skip(state, current, form))]
pub async fn editor_submit(
    State(state): State<AppState>,
    current: CurrentUser,
    form: Result<Form<EditorForm>, FormRejection>,
) -> Result<Response, AppError> {
    let user_id = current.require(Action::EditArticle)?;
    let (id, form) = form_or_empty(form).into_parts();
    let id = id.ok_or_else(|| {
        AppError::Validation(vec![FieldError::new("article_id", "Choose an article to edit.")])
    })?;
    edit_article(state.articles.as_ref(), Some(user_id), id, form).await?;
    Ok(redirect_with("/user_articles", Flash::ArticleUpdated))
}

#[instrument(skip(state, current, path, flash))]
pub async fn edit_page(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<ArticleId>, PathRejection>,
    flash: IncomingFlash,
) -> Result<Page<EditorView>, AppError> {
    let user_id = current.require(Action::EditArticle)?;
    let Path(id) = path?;
    let article =
        load_owned(state.articles.as_ref(), Some(user_id), id, Action::EditArticle).await?;
    Ok(Page::new(flash, article.into()))
}

#[instrument(skip(state, current, path, form))]
pub async fn edit(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<ArticleId>, PathRejection>,
    form: Result<Form<ArticleForm>, FormRejection>,
) -> Result<Response, AppError> {
    let user_id = current.require(Action::EditArticle)?;
    let Path(id) = path?;
    edit_article(state.articles.as_ref(), Some(user_id), id, form_or_empty(form)).await?;
    Ok(redirect_with("/user_articles", Flash::ArticleUpdated))
}

#[instrument(skip(state, current, path))]
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<ArticleId>, PathRejection>,
) -> Result<Response, AppError> {
    let user_id = current.require(Action::DeleteArticle)?;
    let Path(id) = path?;
    delete_article(state.articles.as_ref(), Some(user_id), id).await?;
    Ok(redirect_with("/user_articles", Flash::ArticleDeleted))
}
