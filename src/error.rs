use std::fmt;

use axum::{
    extract::rejection::{FormRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::{db::StoreError, flash::{redirect_with, Flash}};

/// What the client was trying to do when a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewProfile,
    AddArticle,
    ViewArticles,
    EditArticle,
    DeleteArticle,
}

impl Action {
    fn login_flash(self) -> Flash {
        match self {
            Action::ViewProfile => Flash::LoginToViewProfile,
            Action::AddArticle => Flash::LoginToAddArticle,
            Action::ViewArticles => Flash::LoginToViewArticles,
            Action::EditArticle => Flash::LoginToEditArticle,
            Action::DeleteArticle => Flash::LoginToDeleteArticle,
        }
    }

    fn not_owner_flash(self) -> Flash {
        match self {
            Action::DeleteArticle => Flash::NotOwnerDelete,
            _ => Flash::NotOwnerEdit,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::ViewProfile => "view the profile",
            Action::AddArticle => "add an article",
            Action::ViewArticles => "view own articles",
            Action::EditArticle => "edit an article",
            Action::DeleteArticle => "delete an article",
        };
        f.write_str(s)
    }
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("authentication required to {0}")]
    NotAuthenticated(Action),

    #[error("only the author may {0}")]
    NotOwner(Action),

    #[error("article not found")]
    ArticleNotFound,

    #[error("page not found")]
    PageNotFound,

    #[error("invalid form submission")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        debug!(%rejection, "unmatched path parameter");
        AppError::PageNotFound
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(%rejection, "malformed query string");
        AppError::Validation(vec![FieldError::new("query", "Invalid query parameters.")])
    }
}

/// The submitted form, or an empty one when the body is missing or malformed.
/// Handlers validate after the access check, so a bad body surfaces as field
/// errors only to clients allowed to submit it.
pub fn form_or_empty<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(%rejection, "unreadable form body");
            T::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldError]>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::DuplicateEmail => redirect_with("/signup", Flash::DuplicateEmail),
            AppError::InvalidCredentials => redirect_with("/login", Flash::InvalidCredentials),
            AppError::NotAuthenticated(action) => redirect_with("/login", action.login_flash()),
            AppError::NotOwner(action) => redirect_with("/user_articles", action.not_owner_flash()),
            AppError::ArticleNotFound => redirect_with("/user_articles", Flash::ArticleNotFound),
            AppError::PageNotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "not found",
                    fields: None,
                }),
            )
                .into_response(),
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: "invalid form submission",
                    fields: Some(fields),
                }),
            )
                .into_response(),
            AppError::Store(_) | AppError::Internal(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "internal server error",
                        fields: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}
