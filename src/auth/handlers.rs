use axum::{
    extract::{rejection::FormRejection, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, ProfileView, SignupForm},
        extractors::{CurrentUser, SessionCookie},
        services::{register, verify_credentials},
    },
    error::{form_or_empty, Action, AppError},
    flash::{redirect_with, Flash, IncomingFlash},
    pages::{FormView, Page},
    session::cookie::{clear_cookie, set_cookie},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

pub async fn signup_page(flash: IncomingFlash) -> Page<FormView> {
    Page::new(flash, FormView::SIGNUP)
}

#[instrument(skip(state, form))]
pub async fn signup(
    State(state): State<AppState>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Result<Response, AppError> {
    register(state.users.as_ref(), form_or_empty(form)).await?;
    Ok(redirect_with("/login", Flash::SignedUp))
}

pub async fn login_page(flash: IncomingFlash) -> Page<FormView> {
    Page::new(flash, FormView::LOGIN)
}

#[instrument(skip(state, previous, form))]
pub async fn login(
    State(state): State<AppState>,
    SessionCookie(previous): SessionCookie,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, AppError> {
    let user_id = verify_credentials(state.users.as_ref(), form_or_empty(form)).await?;

    if let Some(old) = previous {
        state.sessions.invalidate(&old).await?;
    }
    let token = state.sessions.create(user_id).await?;
    info!(user_id, "user logged in");

    let cfg = &state.config.session;
    let mut res = Redirect::to("/profile").into_response();
    let cookie = set_cookie(
        &cfg.cookie_name,
        token.as_str(),
        state.sessions.ttl().whole_seconds(),
        cfg.cookie_secure,
    )
    .ok_or_else(|| anyhow::anyhow!("session cookie name {:?} is not a valid header", cfg.cookie_name))?;
    res.headers_mut().append(SET_COOKIE, cookie);
    Ok(res)
}

#[instrument(skip(state, token))]
pub async fn logout(
    State(state): State<AppState>,
    SessionCookie(token): SessionCookie,
) -> Result<Response, AppError> {
    if let Some(token) = token {
        state.sessions.invalidate(&token).await?;
        info!("user logged out");
    }

    let cfg = &state.config.session;
    let mut res = redirect_with("/", Flash::LoggedOut);
    if let Some(cookie) = clear_cookie(&cfg.cookie_name, cfg.cookie_secure) {
        res.headers_mut().append(SET_COOKIE, cookie);
    }
    Ok(res)
}

#[instrument(skip(state, current, flash))]
pub async fn profile(
    State(state): State<AppState>,
    current: CurrentUser,
    flash: IncomingFlash,
) -> Result<Page<ProfileView>, AppError> {
    let user_id = current.require(Action::ViewProfile)?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotAuthenticated(Action::ViewProfile))?;
    Ok(Page::new(flash, ProfileView { user: user.into() }))
}
