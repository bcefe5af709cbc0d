//! Shared business logic for the local endpoints: framework-agnostic pure
//! functions so route handlers stay thin adapters.

use crate::{LoginRequest, OkResponse, ServiceError};

pub const MSG_CREDENTIALS_REQUIRED: &str = "username and password are required";
pub const MSG_INVALID_CREDENTIALS: &str = "invalid credentials";
pub const MSG_LOGGED_OUT: &str = "logged out";

/// Both fields must be non-empty. Whitespace is not trimmed.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ServiceError> {
    if username.is_empty() || password.is_empty() {
        return Err(ServiceError::BadRequest(MSG_CREDENTIALS_REQUIRED.into()));
    }
    Ok(())
}

/// Decode a login body leniently: anything unreadable counts as empty fields.
pub fn parse_login_body(body: &[u8]) -> LoginRequest {
    serde_json::from_slice(body).unwrap_or_default()
}

/// The local, stricter login check.
///
/// There is no user store behind this endpoint, so every well-formed request
/// is denied.
pub fn local_login(req: &LoginRequest) -> Result<OkResponse, ServiceError> {
    validate_credentials(&req.username, &req.password)?;
    Err(ServiceError::Unauthorized(MSG_INVALID_CREDENTIALS.into()))
}

pub fn logout() -> OkResponse {
    OkResponse::ok(MSG_LOGGED_OUT)
}
