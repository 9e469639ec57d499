use thiserror::Error;

/// Top-level error type for the `remlink-api` crate.
///
/// Covers every failure mode across both transports: the persistent
/// WebSocket RPC channel and the one-shot REST surface. `remlink-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The handshake was rejected or ran out of protocol.
    ///
    /// Fatal to the session: the socket is closed before this is
    /// returned, and the same credential is never retried silently.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, non-2xx
    /// status via `error_for_status`, body read failure).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// WebSocket connect or frame-level failure.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The peer closed the channel while a call was still pending.
    /// All in-flight calls on the session fail with this.
    #[error("RPC channel closed by peer")]
    ChannelClosed,

    /// No matching response arrived within the session timeout.
    #[error("No response within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Peer-reported failure ───────────────────────────────────────
    /// The peer returned a well-formed failure (`success: false` on the
    /// RPC channel, or a non-2xx service-invocation response).
    #[error("Remote error{}: {message}", .code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    Remote {
        code: Option<String>,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this failure is in the transport family
    /// (network/socket trouble rather than a peer decision).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::WebSocket(_) | Self::ChannelClosed | Self::Timeout { .. }
        )
    }

    /// Returns `true` if the credential itself was rejected.
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::UNAUTHORIZED),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_display_includes_code() {
        let err = Error::Remote {
            code: Some("unknown_command".into()),
            message: "no such service".into(),
        };
        assert_eq!(err.to_string(), "Remote error [unknown_command]: no such service");
    }

    #[test]
    fn remote_error_display_without_code() {
        let err = Error::Remote {
            code: None,
            message: "no such service".into(),
        };
        assert_eq!(err.to_string(), "Remote error: no such service");
    }

    #[test]
    fn transport_classification() {
        assert!(Error::ChannelClosed.is_transport());
        assert!(Error::Timeout { timeout_secs: 10 }.is_transport());
        assert!(!Error::Authentication { message: "nope".into() }.is_transport());
    }
}
