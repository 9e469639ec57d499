//! Configuration loading and credential resolution for remlink.
//!
//! Settings merge in precedence order: built-in defaults, then the
//! config file, then `REMLINK_`-prefixed environment variables. The
//! defaults match the supervised add-on deployment, where everything is
//! resolvable from the environment alone.
//!
//! The bearer credential is deliberately not part of [`Config`]: it is
//! injected from the environment (`REMLINK_TOKEN`, or the platform's
//! `SUPERVISOR_TOKEN`) and handled as a [`SecretString`] end to end.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Environment variables consulted for the bearer credential, in order.
pub const TOKEN_ENV: &str = "REMLINK_TOKEN";
pub const SUPERVISOR_TOKEN_ENV: &str = "SUPERVISOR_TOKEN";

const ENV_PREFIX: &str = "REMLINK_";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not load configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("No access token found: set {TOKEN_ENV} or {SUPERVISOR_TOKEN_ENV}")]
    MissingToken,

    #[error("base_url must use http or https, got: {url}")]
    InvalidBaseUrl { url: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

// ── Config ──────────────────────────────────────────────────────────

/// Resolved settings for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Platform root; REST paths hang off `{base_url}/api/`.
    pub base_url: Url,

    /// Explicit RPC channel URL. When absent it is derived from
    /// `base_url` (scheme swapped to ws/wss, `/websocket` appended).
    pub ws_url: Option<Url>,

    /// Directory holding the learned-command store files.
    pub storage_dir: PathBuf,

    /// Bound on every blocking point: RPC awaits, HTTP requests.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://supervisor/core"
                .parse()
                .expect("static default URL"),
            ws_url: None,
            storage_dir: PathBuf::from("/config/.storage"),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load from the default config file path plus the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_path())
    }

    /// Load from an explicit file path plus the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(config)
    }

    /// The RPC channel URL: explicit setting, or derived from the base.
    pub fn websocket_url(&self) -> Result<Url, ConfigError> {
        if let Some(url) = &self.ws_url {
            return Ok(url.clone());
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let derived = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}/websocket")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}/websocket")
        } else {
            return Err(ConfigError::InvalidBaseUrl {
                url: base.to_owned(),
            });
        };

        Ok(Url::parse(&derived)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the bearer credential from the environment.
///
/// `REMLINK_TOKEN` wins over the platform-provided `SUPERVISOR_TOKEN`.
/// There is no file-based or hard-coded fallback.
pub fn resolve_token() -> Result<SecretString, ConfigError> {
    for var in [TOKEN_ENV, SUPERVISOR_TOKEN_ENV] {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                return Ok(SecretString::from(value));
            }
        }
    }
    Err(ConfigError::MissingToken)
}

/// Default config file location: the platform config dir, falling back
/// to the working directory.
pub fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "remlink")
        .map_or_else(|| PathBuf::from("remlink.toml"), |dirs| {
            dirs.config_dir().join("config.toml")
        })
}
