//! Shared API types and session logic for k-life.
//!
//! This crate is the single source of truth for the JSON bodies exchanged with
//! the external auth service and the local endpoints, plus the session-cookie
//! predicate used by both enforcement points of the session gate.

use serde::{Deserialize, Serialize};

pub mod crypto;
pub mod service;
pub mod session;

pub use session::{GateDecision, SessionCheck, SessionCodec, SessionGate};

// ─── Auth ────────────────────────────────────────────────────────────────────

/// Username + password login. Missing fields decode as empty strings so the
/// validation step, not the JSON decoder, decides what is acceptable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// User object returned by the external auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    /// Numeric or string id, passed through untouched.
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
    pub username: String,
}

/// Successful response of the external `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthLoginResponse {
    pub user: UserInfo,
}

/// Failure body of the external auth service (`{"message": "..."}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ─── Local endpoints ─────────────────────────────────────────────────────────

/// `{ok, message}` body used by `/api/login` and `/api/logout`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OkResponse {
    pub ok: bool,
    pub message: String,
}

impl OkResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Returned by `GET /api/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ─── Service Error ───────────────────────────────────────────────────────────

/// Framework-agnostic error for the local endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    BadRequest(String),
    Unauthorized(String),
}

impl ServiceError {
    /// HTTP status code as a `u16`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m) | Self::Unauthorized(m) => m,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ServiceError {}

impl From<&ServiceError> for OkResponse {
    fn from(e: &ServiceError) -> Self {
        Self::failed(e.message())
    }
}
