//! k-life web server.
//!
//! One axum router serves the event listing, the login and welcome pages, the
//! small local JSON API and static assets. Every request first passes through
//! the session gate middleware ([`gate::session_gate`]).

mod error;
pub mod gate;
pub mod pages;
mod routes;

use std::path::PathBuf;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use klife_api::SessionGate;
use klife_api_client::{AuthClient, CatalogClient, CatalogLoader};
use klife_runtime_config::AppConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: SessionGate,
    pub catalog: CatalogLoader,
    pub auth: AuthClient,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Wire the upstream clients and the session gate from `config`.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream.timeout())
            .build()?;
        let codec = klife_api::SessionCodec::from_secret(config.session.secret.as_deref());

        Ok(Self {
            gate: SessionGate::new(codec),
            catalog: CatalogLoader::new(CatalogClient::with_client(
                http.clone(),
                &config.upstream.events_url,
            )),
            auth: AuthClient::with_client(http, &config.upstream.auth_url),
            static_dir: config.server.static_dir.clone(),
        })
    }
}

impl FromRef<AppState> for SessionGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

impl FromRef<AppState> for CatalogLoader {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for AuthClient {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/login", post(routes::auth::api_login))
        .route("/logout", post(routes::auth::api_logout));

    let static_dir = state.static_dir.clone();
    if !static_dir.exists() {
        tracing::debug!("static directory {} not found", static_dir.display());
    }

    Router::new()
        .nest("/api", api)
        .route("/", get(routes::events::index))
        .route("/events/refresh", post(routes::events::refresh))
        .route(
            "/login",
            get(routes::auth::login_page).post(routes::auth::login_submit),
        )
        .route("/logout", post(routes::auth::logout))
        .route("/welcome", get(routes::welcome::welcome))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::session_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
