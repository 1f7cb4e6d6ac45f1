//! One-shot user-facing messages carried across a redirect.
//!
//! The redirecting response stores a short code in the `flash` cookie; the
//! next page that renders picks it up, shows the message and clears the cookie.
//! Responses only mark what should happen to the cookie; [`flash_cookie_middleware`]
//! writes the header with the configured cookie attributes.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::{
    session::cookie::{clear_cookie, parse_cookie, set_cookie},
    state::AppState,
};

pub const FLASH_COOKIE: &str = "flash";
const FLASH_MAX_AGE_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    SignedUp,
    DuplicateEmail,
    InvalidCredentials,
    LoggedOut,
    LoginToViewProfile,
    LoginToAddArticle,
    LoginToViewArticles,
    LoginToEditArticle,
    LoginToDeleteArticle,
    NotOwnerEdit,
    NotOwnerDelete,
    ArticleNotFound,
    ArticleCreated,
    ArticleUpdated,
    ArticleDeleted,
}

impl Flash {
    pub const ALL: [Flash; 15] = [
        Flash::SignedUp,
        Flash::DuplicateEmail,
        Flash::InvalidCredentials,
        Flash::LoggedOut,
        Flash::LoginToViewProfile,
        Flash::LoginToAddArticle,
        Flash::LoginToViewArticles,
        Flash::LoginToEditArticle,
        Flash::LoginToDeleteArticle,
        Flash::NotOwnerEdit,
        Flash::NotOwnerDelete,
        Flash::ArticleNotFound,
        Flash::ArticleCreated,
        Flash::ArticleUpdated,
        Flash::ArticleDeleted,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Flash::SignedUp => "signed_up",
            Flash::DuplicateEmail => "duplicate_email",
            Flash::InvalidCredentials => "invalid_credentials",
            Flash::LoggedOut => "logged_out",
            Flash::LoginToViewProfile => "login_profile",
            Flash::LoginToAddArticle => "login_add_article",
            Flash::LoginToViewArticles => "login_view_articles",
            Flash::LoginToEditArticle => "login_edit_article",
            Flash::LoginToDeleteArticle => "login_delete_article",
            Flash::NotOwnerEdit => "not_owner_edit",
            Flash::NotOwnerDelete => "not_owner_delete",
            Flash::ArticleNotFound => "article_not_found",
            Flash::ArticleCreated => "article_created",
            Flash::ArticleUpdated => "article_updated",
            Flash::ArticleDeleted => "article_deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::SignedUp => "Account created. Please log in.",
            Flash::DuplicateEmail => "An account with this email already exists.",
            Flash::InvalidCredentials => "Invalid email or password. Please try again.",
            Flash::LoggedOut => "You have been logged out.",
            Flash::LoginToViewProfile => "You need to log in to view your profile.",
            Flash::LoginToAddArticle => "You need to log in to add an article.",
            Flash::LoginToViewArticles => "You need to log in to view your articles.",
            Flash::LoginToEditArticle => "You need to log in to edit an article.",
            Flash::LoginToDeleteArticle => "You need to log in to delete an article.",
            Flash::NotOwnerEdit => "You are not authorized to edit this article.",
            Flash::NotOwnerDelete => "You are not authorized to delete this article.",
            Flash::ArticleNotFound => "That article does not exist.",
            Flash::ArticleCreated => "Article published.",
            Flash::ArticleUpdated => "Article updated successfully.",
            Flash::ArticleDeleted => "Article deleted successfully.",
        }
    }

    pub fn level(self) -> FlashLevel {
        match self {
            Flash::SignedUp
            | Flash::LoggedOut
            | Flash::ArticleCreated
            | Flash::ArticleUpdated
            | Flash::ArticleDeleted => FlashLevel::Success,
            _ => FlashLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: &'static str,
}

impl From<Flash> for FlashMessage {
    fn from(f: Flash) -> Self {
        Self {
            level: f.level(),
            message: f.message(),
        }
    }
}

/// Flash left by the previous response, if any. Unknown codes are ignored.
pub struct IncomingFlash(pub Option<Flash>);

#[async_trait]
impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let flash = parse_cookie(&parts.headers, FLASH_COOKIE).and_then(|c| Flash::from_code(&c));
        Ok(IncomingFlash(flash))
    }
}

/// Response extension telling [`flash_cookie_middleware`] what to do with the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCookie {
    Set(Flash),
    Clear,
}

/// `303 See Other` to `to`, leaving `flash` for the next page.
pub fn redirect_with(to: &str, flash: Flash) -> Response {
    let mut res = Redirect::to(to).into_response();
    res.extensions_mut().insert(FlashCookie::Set(flash));
    res
}

pub async fn flash_cookie_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    let Some(op) = res.extensions_mut().remove::<FlashCookie>() else {
        return res;
    };
    let secure = state.config.session.cookie_secure;
    let cookie = match op {
        FlashCookie::Set(flash) => set_cookie(FLASH_COOKIE, flash.code(), FLASH_MAX_AGE_SECS, secure),
        FlashCookie::Clear => clear_cookie(FLASH_COOKIE, secure),
    };
    if let Some(cookie) = cookie {
        res.headers_mut().append(SET_COOKIE, cookie);
    }
    res
}
