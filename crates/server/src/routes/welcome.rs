use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};

use klife_api::session::{login_redirect, DEFAULT_LANDING};
use klife_api::{SessionCheck, SessionGate};

use crate::gate::cookie_header;
use crate::pages;

/// GET /welcome: render-boundary check with the same predicate the
/// middleware uses.
pub async fn welcome(State(gate): State<SessionGate>, headers: HeaderMap) -> Response {
    match gate.check(cookie_header(&headers).as_deref()) {
        SessionCheck::Authenticated(username) => pages::welcome_page(&username).into_response(),
        SessionCheck::Anonymous => Redirect::temporary(&login_redirect(DEFAULT_LANDING)).into_response(),
    }
}
