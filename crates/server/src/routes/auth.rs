use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;

use klife_api::service;
use klife_api::session::{logout_cookies, LOGIN_PATH};
use klife_api::{OkResponse, SessionGate};
use klife_api_client::{AuthClient, LoginFlow, LoginState};

use crate::error::ApiErr;
use crate::pages;

// ---------------------------------------------------------------------------
// Local JSON endpoints
// ---------------------------------------------------------------------------

/// POST /api/login: strict local check. The body is decoded leniently so a
/// malformed request is reported as missing credentials.
pub async fn api_login(body: Bytes) -> Result<Json<OkResponse>, ApiErr> {
    let req = service::parse_login_body(&body);
    Ok(Json(service::local_login(&req)?))
}

/// POST /api/logout: clear both session cookies.
pub async fn api_logout() -> impl IntoResponse {
    let [legacy, session] = logout_cookies();
    (
        AppendHeaders([(SET_COOKIE, legacy), (SET_COOKIE, session)]),
        Json(service::logout()),
    )
}

// ---------------------------------------------------------------------------
// Login form
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub from: Option<String>,
}

/// GET /login
pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    pages::login_page("", query.from.as_deref(), None)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub from: Option<String>,
}

/// POST /login: run the login flow against the auth service. Success sets
/// the session cookie and sends the browser on with `303 See Other`; any
/// failure re-renders the form with the inline message.
pub async fn login_submit(
    State(auth): State<AuthClient>,
    State(gate): State<SessionGate>,
    Form(form): Form<LoginForm>,
) -> Response {
    let from = form.from.as_deref().filter(|f| !f.is_empty());
    let mut flow = LoginFlow::new(auth, gate.codec().clone());

    flow.submit(&form.username, &form.password, from).await;
    if let LoginState::Succeeded(ok) = flow.state() {
        return (
            AppendHeaders([(SET_COOKIE, ok.set_cookie.clone())]),
            Redirect::to(&ok.redirect_to),
        )
            .into_response();
    }

    let message = flow.error_message();
    pages::login_page(&form.username, from, message.as_deref()).into_response()
}

/// POST /logout: form variant of `/api/logout` for the welcome page.
pub async fn logout() -> impl IntoResponse {
    let [legacy, session] = logout_cookies();
    (
        AppendHeaders([(SET_COOKIE, legacy), (SET_COOKIE, session)]),
        Redirect::to(LOGIN_PATH),
    )
}
