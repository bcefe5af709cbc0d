//! Runtime configuration shared by the k-life server and CLI.
//!
//! Values come from an optional `klife.toml` (path taken from `KLIFE_CONFIG`)
//! and are then overridden by environment variables. Every field has a
//! default, so an empty file or no file at all yields a working config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "klife.toml";
/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "KLIFE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/static/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// External services the app talks to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamSettings {
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_events_url")]
    pub events_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            events_url: default_events_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionSettings {
    /// When set, session cookies are HMAC-signed and verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_auth_url() -> String {
    "http://localhost:5000/api/auth/login".to_string()
}

fn default_events_url() -> String {
    "http://localhost:5000/api/events".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

impl AppConfig {
    /// Read `path` if it exists; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `KLIFE_CONFIG` (or `./klife.toml`) and apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        let mut config = Self::from_file(&path)?;
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`. Empty values are ignored.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |var: &str| lookup(var).filter(|s| !s.is_empty());

        if let Some(bind) = get("KLIFE_BIND") {
            self.server.bind = bind;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                value: port,
            })?;
        }
        if let Some(dir) = get("KLIFE_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        if let Some(url) = get("KLIFE_AUTH_URL") {
            self.upstream.auth_url = url;
        }
        if let Some(url) = get("KLIFE_EVENTS_URL") {
            self.upstream.events_url = url;
        }
        if let Some(secs) = get("KLIFE_HTTP_TIMEOUT_SECS") {
            self.upstream.timeout_secs =
                secs.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "KLIFE_HTTP_TIMEOUT_SECS",
                    value: secs,
                })?;
        }
        if let Some(secret) = get("KLIFE_SESSION_SECRET") {
            self.session.secret = Some(secret);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
