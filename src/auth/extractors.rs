use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{
    auth::repo_types::UserId,
    error::{Action, AppError},
    session::{cookie::parse_cookie, SessionToken},
    state::AppState,
};

/// Session token presented by the client, if any. Not validated.
pub struct SessionCookie(pub Option<SessionToken>);

#[async_trait]
impl FromRequestParts<AppState> for SessionCookie {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parse_cookie(&parts.headers, &state.config.session.cookie_name)
            .map(SessionToken::from);
        Ok(SessionCookie(token))
    }
}

/// Identity resolved from the session cookie. `None` is the anonymous state,
/// not a failure.
pub struct CurrentUser(pub Option<UserId>);

impl CurrentUser {
    pub fn require(&self, action: Action) -> Result<UserId, AppError> {
        self.0.ok_or(AppError::NotAuthenticated(action))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionCookie(token) = SessionCookie::from_request_parts(parts, state)
            .await
            .unwrap_or(SessionCookie(None));
        let Some(token) = token else {
            return Ok(CurrentUser(None));
        };
        let user_id = state.sessions.resolve(&token).await?;
        Ok(CurrentUser(user_id))
    }
}
