mod common;

use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::spawn_app;

fn set_cookies(resp: &reqwest::Response) -> Vec<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn welcome_without_session_redirects_to_login() {
    let app = spawn_app(None, None).await;

    let resp = app.get("/welcome").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[LOCATION], "/login?from=/welcome");
    assert_eq!(resp.headers()["x-app"], "k-life-client");
}

#[tokio::test]
async fn nested_protected_path_keeps_its_origin() {
    let app = spawn_app(None, None).await;

    let resp = app.get("/welcome/settings").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[LOCATION], "/login?from=/welcome/settings");
}

#[tokio::test]
async fn welcome_with_session_renders_the_user() {
    let app = spawn_app(None, None).await;

    let resp = app
        .client
        .get(format!("{}/welcome", app.url))
        .header(COOKIE, "theme=dark; username=kim%20min")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-app"], "k-life-client");
    let html = resp.text().await.unwrap();
    assert!(html.contains("Welcome, kim min!"));
}

#[tokio::test]
async fn empty_cookie_is_not_a_session() {
    let app = spawn_app(None, None).await;

    let resp = app
        .client
        .get(format!("{}/welcome", app.url))
        .header(COOKIE, "username=")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn unprotected_pages_pass_with_marker() {
    let app = spawn_app(None, None).await;

    let resp = app.get("/login?from=/welcome").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-app"], "k-life-client");
    let html = resp.text().await.unwrap();
    assert!(html.contains(r#"name="from" value="/welcome""#));
}

#[tokio::test]
async fn static_assets_bypass_the_gate() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.css"), "body{}").unwrap();
    let app = spawn_app(None, Some(dir.path())).await;

    let resp = app.get("/static/app.css").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-app").is_none());
    assert_eq!(resp.text().await.unwrap(), "body{}");
}

#[tokio::test]
async fn signed_mode_rejects_forged_cookies() {
    let app = spawn_app(Some("s3cret"), None).await;

    let resp = app
        .client
        .get(format!("{}/welcome", app.url))
        .header(COOKIE, "username=admin")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn login_form_success_sets_cookie_and_redirects() {
    let app = spawn_app(Some("s3cret"), None).await;

    let resp = app
        .client
        .post(format!("{}/login", app.url))
        .form(&[("username", "admin"), ("password", "123456"), ("from", "/welcome")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/welcome");
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("username=admin."));
    assert!(cookies[0].ends_with("; Path=/; Max-Age=3600"));

    // The issued cookie opens the protected page.
    let cookie = cookies[0].split(';').next().unwrap().to_string();
    let resp = app
        .client
        .get(format!("{}/welcome", app.url))
        .header(COOKIE, cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Welcome, admin!"));
}

#[tokio::test]
async fn login_form_rejection_rerenders_with_message() {
    let app = spawn_app(None, None).await;

    let resp = app
        .client
        .post(format!("{}/login", app.url))
        .form(&[("username", "admin"), ("password", "nope")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(set_cookies(&resp).is_empty());
    let html = resp.text().await.unwrap();
    assert!(html.contains("bad creds"));
    assert!(html.contains(r#"value="admin""#));
}

#[tokio::test]
async fn login_form_requires_both_fields() {
    let app = spawn_app(None, None).await;

    let resp = app
        .client
        .post(format!("{}/login", app.url))
        .form(&[("username", "admin")])
        .send()
        .await
        .unwrap();
    let html = resp.text().await.unwrap();
    assert!(html.contains("Please enter both username and password."));
}

#[tokio::test]
async fn local_login_endpoint_validates_then_denies() {
    let app = spawn_app(None, None).await;
    let url = format!("{}/api/login", app.url);

    let resp = app
        .client
        .post(&url)
        .json(&json!({"username": "admin"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);

    let resp = app.client.post(&url).body("not json").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .client
        .post(&url)
        .json(&json!({"username": "admin", "password": "123456"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"ok": false, "message": "invalid credentials"}));
}

#[tokio::test]
async fn api_logout_clears_both_cookies() {
    let app = spawn_app(None, None).await;

    let resp = app
        .client
        .post(format!("{}/api/logout", app.url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("auth_token=;")));
    assert!(cookies.iter().any(|c| c.starts_with("username=;")));
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"ok": true, "message": "logged out"}));
}

#[tokio::test]
async fn form_logout_redirects_to_login() {
    let app = spawn_app(None, None).await;

    let resp = app
        .client
        .post(format!("{}/logout", app.url))
        .header(COOKIE, "username=kim")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/login");
    assert_eq!(set_cookies(&resp).len(), 2);
}

#[tokio::test]
async fn api_client_talks_to_the_local_endpoints() {
    use klife_api::LoginRequest;
    use klife_api_client::ApiClient;

    let app = spawn_app(None, None).await;
    let client = ApiClient::new(&app.url, std::time::Duration::from_secs(5)).unwrap();

    assert_eq!(client.health().await.unwrap().status, "ok");
    assert_eq!(client.logout().await.unwrap(), "/login");

    let err = client
        .local_login(&LoginRequest {
            username: "admin".into(),
            password: "123456".into(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("401"));
}
