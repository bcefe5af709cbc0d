//! Request-boundary session gate.
//!
//! Runs [`SessionGate::evaluate`] on every request. Static assets bypass the
//! gate untouched; everything else is either redirected to the login page or
//! forwarded, and in both cases carries the `x-app` marker header.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use klife_api::session::{APP_MARKER_HEADER, APP_MARKER_VALUE};
use klife_api::{GateDecision, SessionGate};

pub async fn session_gate(State(gate): State<SessionGate>, req: Request, next: Next) -> Response {
    let cookies = cookie_header(req.headers());
    match gate.evaluate(req.uri().path(), cookies.as_deref()) {
        GateDecision::Bypass => next.run(req).await,
        GateDecision::Redirect(location) => {
            tracing::debug!(path = %req.uri().path(), "no session, redirecting to {location}");
            stamp(Redirect::temporary(&location).into_response())
        }
        GateDecision::Pass => stamp(next.run(req).await),
    }
}

/// All `Cookie` headers of a request joined into one `a=1; b=2` string.
pub fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let joined = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    (!joined.is_empty()).then_some(joined)
}

fn stamp(mut resp: Response) -> Response {
    resp.headers_mut().insert(
        HeaderName::from_static(APP_MARKER_HEADER),
        HeaderValue::from_static(APP_MARKER_VALUE),
    );
    resp
}
