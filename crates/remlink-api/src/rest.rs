//! One-shot REST surface: entity-state snapshot and service invocation.
//!
//! Wraps `reqwest::Client` with bearer auth and the platform's `/api/`
//! path layout. The snapshot is a single stateless GET with no caching
//! and no partial fallback; service invocation is fire-and-accept.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;

// ── EntityState ──────────────────────────────────────────────────────

/// One entity's runtime state, verbatim from the snapshot endpoint.
///
/// `attributes` is kept as raw JSON -- only `supported_features` is ever
/// interpreted, and everything else passes through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub attributes: serde_json::Map<String, Value>,
}

impl EntityState {
    /// The entity's capability bitmask, `0` when absent or non-numeric.
    pub fn supported_features(&self) -> u64 {
        self.attributes
            .get("supported_features")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }
}

// ── RestClient ───────────────────────────────────────────────────────

/// Bearer-authenticated client for the platform's REST API.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl RestClient {
    /// Create a client with its own connection pool and request timeout.
    ///
    /// `base_url` is the platform root (e.g. `http://supervisor/core`);
    /// the `/api/` segment is appended per request.
    pub fn new(base_url: Url, token: SecretString, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self::with_client(http, base_url, token))
    }

    /// Create a client around a pre-built `reqwest::Client` (tests).
    pub fn with_client(http: reqwest::Client, base_url: Url, token: SecretString) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// The platform base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Snapshot fetch ───────────────────────────────────────────────

    /// Fetch the full current set of entity states, keyed by entity id.
    ///
    /// Network failures and non-2xx statuses both surface as
    /// [`Error::Transport`]; whether that is fatal is the caller's call
    /// (it is, for device resolution).
    pub async fn fetch_states(&self) -> Result<HashMap<String, EntityState>, Error> {
        let url = self.api_url("states")?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await
            .map_err(Error::Transport)?
            .error_for_status()
            .map_err(Error::Transport)?;

        let body = resp.text().await.map_err(Error::Transport)?;
        let states: Vec<EntityState> = serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        debug!(count = states.len(), "fetched state snapshot");

        Ok(states
            .into_iter()
            .map(|s| (s.entity_id.clone(), s))
            .collect())
    }

    // ── Service invocation ───────────────────────────────────────────

    /// Invoke a platform service: `POST /api/services/{domain}/{service}`.
    ///
    /// Success means the platform accepted the call, not that the
    /// physical action completed -- the entity transitions its state
    /// asynchronously. A non-2xx response is the peer rejecting the
    /// invocation and surfaces as [`Error::Remote`] with the body.
    pub async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: &Value,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("services/{domain}/{service}"))?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.bearer())
            .json(data)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "bearer token rejected (HTTP 401)".into(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Remote {
                code: Some(status.as_u16().to_string()),
                message: format!(
                    "service {domain}.{service} rejected: {}",
                    &body[..body.len().min(200)]
                ),
            });
        }

        debug!(domain, service, "service invocation accepted");
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/api/{path}")).map_err(Error::InvalidUrl)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}
