use thiserror::Error;

/// Why the event catalog could not be loaded. `Display` is the text shown
/// to users; transport details are kept for logging.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The endpoint answered with something other than 200.
    #[error("HTTP {0}")]
    Status(u16),
    /// 200, but the body was not JSON or did not hold event records.
    #[error("HTTP 200: malformed payload")]
    Malformed { detail: String },
    /// DNS, connect, timeout or body read failure.
    #[error("network error or request cancelled")]
    Network { detail: String },
    /// The request was aborted through its cancellation token.
    #[error("request cancelled")]
    Cancelled,
}

impl CatalogError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network {
            detail: err.to_string(),
        }
    }
}

pub const MSG_MISSING_CREDENTIALS: &str = "Please enter both username and password.";
pub const MSG_LOGIN_FAILED: &str = "Login failed.";
pub const MSG_NETWORK: &str = "Network error, please try again later.";

/// Why a login attempt failed. `Display` is the inline message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    /// Caught before any request was made.
    #[error("Please enter both username and password.")]
    MissingCredentials,
    /// The auth service refused; carries its message or the default.
    #[error("{0}")]
    Rejected(String),
    #[error("Network error, please try again later.")]
    Network { detail: String },
}

impl LoginError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network {
            detail: err.to_string(),
        }
    }
}
