//! Spawns the app and a fake upstream (auth service + events feed) on
//! ephemeral ports.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use klife_runtime_config::AppConfig;
use klife_server::{app, AppState};

pub struct TestApp {
    pub url: String,
    pub client: reqwest::Client,
    pub events_hits: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn events_hits(&self) -> usize {
        self.events_hits.load(Ordering::SeqCst)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.url))
            .send()
            .await
            .expect("request")
    }
}

pub fn sample_events() -> Value {
    json!({
        "data": [
            {"TITLE": "Ghibli OST Concert", "CODENAME": "클래식", "PLACE": "Sejong Center", "DATE": "2025-01-01~2025-01-05", "USE_FEE": "전석 30,000원"},
            {"TITLE": "Night Market", "CODENAME": "축제", "PLACE": "Yeouido Park", "DATE": "2025-03-01~2025-03-01", "IS_FREE": "무료"},
            {"TITLE": "Calligraphy Workshop", "CODENAME": "교육/체험", "PLACE": "Community Hall"}
        ]
    })
}

#[derive(Clone)]
struct Upstream {
    events: Arc<Value>,
    hits: Arc<AtomicUsize>,
    /// Requests answered with 500 before the feed starts working.
    failures: usize,
}

async fn fake_login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["username"] == "admin" && body["password"] == "123456" {
        (
            StatusCode::OK,
            Json(json!({"user": {"id": 1, "name": "Admin", "username": "admin"}})),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad creds"})))
    }
}

async fn fake_events(State(upstream): State<Upstream>) -> axum::response::Response {
    let n = upstream.hits.fetch_add(1, Ordering::SeqCst);
    if n < upstream.failures {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response();
    }
    Json(upstream.events.as_ref().clone()).into_response()
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

pub async fn spawn_app(secret: Option<&str>, static_dir: Option<&Path>) -> TestApp {
    spawn_app_with_events(sample_events(), secret, static_dir).await
}

pub async fn spawn_app_with_events(
    events: Value,
    secret: Option<&str>,
    static_dir: Option<&Path>,
) -> TestApp {
    spawn_app_with_feed(events, 0, secret, static_dir).await
}

/// Like [`spawn_app_with_events`], but the feed answers its first
/// `failures` requests with `500`.
pub async fn spawn_app_with_feed(
    events: Value,
    failures: usize,
    secret: Option<&str>,
    static_dir: Option<&Path>,
) -> TestApp {
    let hits = Arc::new(AtomicUsize::new(0));
    let upstream = Router::new()
        .route("/api/auth/login", post(fake_login))
        .route("/api/events", get(fake_events))
        .with_state(Upstream {
            events: Arc::new(events),
            hits: Arc::clone(&hits),
            failures,
        });
    let upstream_url = serve(upstream).await;

    let mut config = AppConfig::default();
    config.upstream.auth_url = format!("{upstream_url}/api/auth/login");
    config.upstream.events_url = format!("{upstream_url}/api/events");
    config.session.secret = secret.map(str::to_string);
    if let Some(dir) = static_dir {
        config.server.static_dir = dir.to_path_buf();
    }

    let state = AppState::from_config(&config).expect("app state");
    let url = serve(app(state)).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client");

    TestApp {
        url,
        client,
        events_hits: hits,
    }
}
