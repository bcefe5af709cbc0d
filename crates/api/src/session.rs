//! Cookie-backed sessions.
//!
//! A session is nothing more than a `username` cookie. [`SessionGate::check`]
//! is the single predicate behind both enforcement points (the request
//! middleware and the welcome page render), so the two always reach the same
//! decision for the same cookie header.

use crate::crypto;

pub const SESSION_COOKIE: &str = "username";
/// Legacy cookie. Cleared on logout, never read.
pub const LEGACY_TOKEN_COOKIE: &str = "auth_token";
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60;

pub const PROTECTED_PREFIX: &str = "/welcome";
pub const LOGIN_PATH: &str = "/login";
/// Where a successful login lands when no return path was given.
pub const DEFAULT_LANDING: &str = "/welcome";

pub const APP_MARKER_HEADER: &str = "x-app";
pub const APP_MARKER_VALUE: &str = "k-life-client";

/// Paths the gate never intercepts.
pub const STATIC_PREFIXES: &[&str] = &["/static/", "/favicon.ico"];

/// Find a cookie by name in a `Cookie` request header (`a=1; b=2`).
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k.trim() == name).then_some(v.trim())
    })
}

/// `Set-Cookie` value that clears `name`.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0")
}

/// `Set-Cookie` values for logout: the session cookie and the legacy token.
pub fn logout_cookies() -> [String; 2] {
    [clear_cookie(LEGACY_TOKEN_COOKIE), clear_cookie(SESSION_COOKIE)]
}

// ─── Codec ───────────────────────────────────────────────────────────────────

/// How a username is stored in, and recovered from, the session cookie.
#[derive(Clone)]
pub enum SessionCodec {
    /// Plain URL-encoded username; any non-empty value is trusted.
    Presence,
    /// `<url-encoded username>.<hex hmac-sha256>`; the signature is checked.
    Signed { secret: String },
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Presence => f.write_str("Presence"),
            Self::Signed { .. } => f.write_str("Signed { .. }"),
        }
    }
}

impl SessionCodec {
    /// Signed when a non-empty secret is configured, presence-only otherwise.
    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Self::Signed {
                secret: secret.to_string(),
            },
            None => Self::Presence,
        }
    }

    /// Cookie value for `username`.
    pub fn encode(&self, username: &str) -> String {
        let encoded = urlencoding::encode(username).into_owned();
        match self {
            Self::Presence => encoded,
            Self::Signed { secret } => {
                let sig = crypto::sign(secret, &encoded);
                format!("{encoded}.{sig}")
            }
        }
    }

    /// Username carried by a raw cookie value, if it is acceptable.
    pub fn decode(&self, value: &str) -> Option<String> {
        let encoded = match self {
            Self::Presence => value,
            Self::Signed { secret } => {
                let (encoded, sig) = value.rsplit_once('.')?;
                if !crypto::verify(secret, encoded, sig) {
                    return None;
                }
                encoded
            }
        };
        let username = urlencoding::decode(encoded)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| encoded.to_string());
        (!username.is_empty()).then_some(username)
    }

    /// `Set-Cookie` value that opens a session for `username`.
    ///
    /// Readable by page scripts (no `HttpOnly`), root path, one hour.
    pub fn set_cookie(&self, username: &str) -> String {
        format!(
            "{SESSION_COOKIE}={}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}",
            self.encode(username)
        )
    }
}

// ─── Gate ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Authenticated(String),
    Anonymous,
}

impl SessionCheck {
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated(name) => Some(name),
            Self::Anonymous => None,
        }
    }
}

/// Outcome of running the request-boundary gate on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Static asset; not intercepted at all.
    Bypass,
    /// Forward the request (and stamp the marker header).
    Pass,
    /// Send the browser to this location.
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct SessionGate {
    codec: SessionCodec,
}

impl SessionGate {
    pub fn new(codec: SessionCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// The shared predicate: a `username` cookie the codec accepts.
    pub fn check(&self, cookie_header: Option<&str>) -> SessionCheck {
        cookie_header
            .and_then(|h| cookie_value(h, SESSION_COOKIE))
            .and_then(|v| self.codec.decode(v))
            .map_or(SessionCheck::Anonymous, SessionCheck::Authenticated)
    }

    /// Request-boundary decision for `path`.
    pub fn evaluate(&self, path: &str, cookie_header: Option<&str>) -> GateDecision {
        if is_static_path(path) {
            return GateDecision::Bypass;
        }
        if is_protected(path) && self.check(cookie_header) == SessionCheck::Anonymous {
            return GateDecision::Redirect(login_redirect(path));
        }
        GateDecision::Pass
    }
}

pub fn is_static_path(path: &str) -> bool {
    STATIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

pub fn is_protected(path: &str) -> bool {
    path.starts_with(PROTECTED_PREFIX)
}

/// `/login?from=<path>`. Slashes stay literal so `/welcome` reads as
/// `/login?from=/welcome`.
pub fn login_redirect(from: &str) -> String {
    let from = urlencoding::encode(from).replace("%2F", "/");
    format!("{LOGIN_PATH}?from={from}")
}

/// Where to go after login. Only same-origin absolute paths are honoured.
pub fn return_path(from: Option<&str>) -> &str {
    match from {
        Some(p) if p.starts_with('/') && !p.starts_with("//") && !p.contains('\\') => p,
        _ => DEFAULT_LANDING,
    }
}
