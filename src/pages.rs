//! View models returned by the `GET` routes.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::flash::{FlashCookie, FlashMessage, IncomingFlash};

/// A rendered page: the view model plus the flash it consumed.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<FlashMessage>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Page<T> {
    pub fn new(incoming: IncomingFlash, body: T) -> Self {
        Self {
            flash: incoming.0.map(FlashMessage::from),
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let consumed = self.flash.is_some();
        let mut res = Json(self).into_response();
        if consumed {
            res.extensions_mut().insert(FlashCookie::Clear);
        }
        res
    }
}

/// Describes a form the client should render and where to submit it.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub form: &'static str,
    pub action: &'static str,
    pub fields: &'static [&'static str],
}

impl FormView {
    pub const SIGNUP: FormView = FormView {
        form: "signup",
        action: "/signup",
        fields: &["email", "name", "surname", "password"],
    };

    pub const LOGIN: FormView = FormView {
        form: "login",
        action: "/login",
        fields: &["email", "password"],
    };

    pub const ARTICLE: FormView = FormView {
        form: "article",
        action: "/add_article",
        fields: &["title", "content"],
    };
}
