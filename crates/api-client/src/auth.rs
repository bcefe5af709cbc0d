//! Login against the external auth service.

use std::time::Duration;

use klife_api::session::{return_path, SessionCodec};
use klife_api::{AuthLoginResponse, LoginRequest, MessageBody, UserInfo};

use crate::error::{LoginError, MSG_LOGIN_FAILED};

/// Client for `POST /api/auth/login` on the external auth service.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    login_url: String,
}

impl AuthClient {
    pub fn new(login_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, login_url))
    }

    pub fn with_client(client: reqwest::Client, login_url: &str) -> Self {
        Self {
            client,
            login_url: login_url.to_string(),
        }
    }

    /// Any 2xx is a success and must carry `{"user": {...}}`. Anything else
    /// is a rejection with the service's `message`, or the default text.
    pub async fn login(&self, req: &LoginRequest) -> Result<UserInfo, LoginError> {
        let resp = self
            .client
            .post(&self.login_url)
            .json(req)
            .send()
            .await
            .map_err(LoginError::network)?;
        let status = resp.status();
        let body = resp.text().await.map_err(LoginError::network)?;

        if status.is_success() {
            let parsed: AuthLoginResponse =
                serde_json::from_str(&body).map_err(LoginError::network)?;
            return Ok(parsed.user);
        }

        let message = serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| MSG_LOGIN_FAILED.to_string());
        tracing::debug!(%status, "login rejected: {message}");
        Err(LoginError::Rejected(message))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub user: UserInfo,
    /// `Set-Cookie` value opening the session.
    pub set_cookie: String,
    /// Where to navigate next.
    pub redirect_to: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginState {
    Idle,
    Submitting,
    Succeeded(LoginSuccess),
    Failed(LoginError),
}

/// `Idle → Submitting → Succeeded | Failed`, one form's worth of state.
pub struct LoginFlow {
    auth: AuthClient,
    codec: SessionCodec,
    state: LoginState,
}

impl LoginFlow {
    pub fn new(auth: AuthClient, codec: SessionCodec) -> Self {
        Self {
            auth,
            codec,
            state: LoginState::Idle,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Inline message for the current state, if it is a failure.
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            LoginState::Failed(e) => Some(e.to_string()),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, LoginState::Submitting)
    }

    /// Validate, call the auth service and, on success, issue the session
    /// cookie and pick the return path (`from` when safe, else the landing page).
    pub async fn submit(&mut self, username: &str, password: &str, from: Option<&str>) -> &LoginState {
        if username.is_empty() || password.is_empty() {
            self.state = LoginState::Failed(LoginError::MissingCredentials);
            return &self.state;
        }

        self.state = LoginState::Submitting;
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        self.state = match self.auth.login(&req).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "login succeeded");
                LoginState::Succeeded(LoginSuccess {
                    set_cookie: self.codec.set_cookie(&user.username),
                    redirect_to: return_path(from).to_string(),
                    user,
                })
            }
            Err(e) => {
                if let LoginError::Network { detail } = &e {
                    tracing::warn!("login request failed: {detail}");
                }
                LoginState::Failed(e)
            }
        };
        &self.state
    }
}
