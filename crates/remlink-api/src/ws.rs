//! Persistent WebSocket RPC session.
//!
//! Implements the control plane's message protocol: an authentication
//! handshake up front (`auth_required` → `auth` → `auth_ok`), then
//! request/response pairs correlated by a session-scoped integer id.
//! Responses that arrive for a different pending id are buffered, never
//! discarded, so interleaved calls on one session each receive their own
//! result.
//!
//! # Example
//!
//! ```rust,ignore
//! use remlink_api::RpcSession;
//! use secrecy::SecretString;
//! use std::time::Duration;
//! use url::Url;
//!
//! let url = Url::parse("ws://supervisor/core/websocket")?;
//! let token = SecretString::from(std::env::var("SUPERVISOR_TOKEN")?);
//!
//! let mut session = RpcSession::connect(&url, &token, Duration::from_secs(10)).await?;
//! let registry = session.call("config/entity_registry/list", serde_json::json!({})).await?;
//! session.close().await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;

// ── Transport abstraction ────────────────────────────────────────────

/// A bidirectional stream of WebSocket messages.
///
/// Satisfied by `tokio-tungstenite`'s client stream; tests drive the
/// session against a locally accepted server stream instead.
pub trait MessageTransport:
    Stream<Item = Result<Message, tungstenite::Error>>
    + futures_util::Sink<Message, Error = tungstenite::Error>
    + Unpin
    + Send
{
}

impl<T> MessageTransport for T where
    T: Stream<Item = Result<Message, tungstenite::Error>>
        + futures_util::Sink<Message, Error = tungstenite::Error>
        + Unpin
        + Send
{
}

/// The concrete transport used outside of tests.
pub type WsTransport = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

// ── Wire envelopes ───────────────────────────────────────────────────

/// Every frame the peer sends carries a `type` discriminator; `result`
/// frames additionally carry `id`, `success`, and `result`/`error`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RemoteFailure>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteFailure {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl RemoteFailure {
    /// Error codes arrive as strings on current platforms and as bare
    /// integers on older ones; render both as strings.
    fn code_string(&self) -> Option<String> {
        match self.code.as_ref()? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

const MSG_AUTH_REQUIRED: &str = "auth_required";
const MSG_AUTH_OK: &str = "auth_ok";
const MSG_AUTH_INVALID: &str = "auth_invalid";
const MSG_RESULT: &str = "result";

// ── RpcSession ───────────────────────────────────────────────────────

/// An authenticated RPC session over a persistent WebSocket.
///
/// Ids are assigned monotonically per session and never reused. `call`
/// takes `&mut self`, so id assignment and read-buffer draining are
/// serialized by the borrow checker; to share a session across tasks,
/// wrap it in a `tokio::sync::Mutex`. The recommended shape is one
/// session per logical operation.
pub struct RpcSession<S = WsTransport> {
    stream: S,
    next_id: u64,
    /// Result frames read while waiting for a different id. Drained
    /// before touching the socket on each subsequent call.
    pending: HashMap<u64, Envelope>,
    timeout: Duration,
}

// Manual impl: the transport type carries no `Debug` bound.
impl<S> fmt::Debug for RpcSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcSession")
            .field("next_id", &self.next_id)
            .field("buffered", &self.pending.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RpcSession<WsTransport> {
    /// Open the transport and run the authentication handshake.
    ///
    /// The peer must speak first with `auth_required`; anything else
    /// fails the session. On `auth_invalid` (or any protocol violation)
    /// the socket is closed and [`Error::Authentication`] is returned —
    /// the credential is never retried here.
    pub async fn connect(
        ws_url: &Url,
        token: &SecretString,
        timeout: Duration,
    ) -> Result<Self, Error> {
        debug!(url = %ws_url, "connecting RPC channel");

        let (stream, _response) = tokio_tungstenite::connect_async(ws_url.as_str())
            .await
            .map_err(|e| Error::WebSocket(e.to_string()))?;

        Self::handshake(stream, token, timeout).await
    }
}

impl<S: MessageTransport> RpcSession<S> {
    /// Run the authentication handshake over an already-open transport.
    ///
    /// Consumes the stream; on any handshake failure the stream is
    /// closed before the error is returned.
    pub async fn handshake(
        mut stream: S,
        token: &SecretString,
        timeout: Duration,
    ) -> Result<Self, Error> {
        match authenticate(&mut stream, token, timeout).await {
            Ok(()) => {
                debug!("RPC channel authenticated");
                Ok(Self {
                    stream,
                    next_id: 1,
                    pending: HashMap::new(),
                    timeout,
                })
            }
            Err(e) => {
                let _ = stream.close().await;
                Err(e)
            }
        }
    }

    /// Send a request and wait for the response with the matching id.
    ///
    /// `payload` must be a JSON object; its fields are flattened into
    /// the envelope alongside `id` and `type`. Results for other ids
    /// read along the way are buffered for their own callers.
    pub async fn call(&mut self, msg_type: &str, payload: Value) -> Result<Value, Error> {
        let id = self.next_id;
        self.next_id += 1;

        let mut envelope = serde_json::Map::new();
        envelope.insert("id".into(), json!(id));
        envelope.insert("type".into(), json!(msg_type));
        if let Value::Object(fields) = payload {
            envelope.extend(fields);
        }

        trace!(id, msg_type, "sending RPC request");

        self.stream
            .send(Message::text(Value::Object(envelope).to_string()))
            .await
            .map_err(|e| Error::WebSocket(e.to_string()))?;

        self.await_result(id).await
    }

    /// Close the session, aborting anything still buffered.
    pub async fn close(mut self) -> Result<(), Error> {
        self.stream
            .close()
            .await
            .map_err(|e| Error::WebSocket(e.to_string()))
    }

    // ── Response correlation ─────────────────────────────────────────

    async fn await_result(&mut self, id: u64) -> Result<Value, Error> {
        loop {
            if let Some(envelope) = self.pending.remove(&id) {
                return unwrap_result(envelope);
            }

            let envelope = self.read_envelope().await?;
            match (envelope.kind.as_str(), envelope.id) {
                (MSG_RESULT, Some(got)) if got == id => return unwrap_result(envelope),
                (MSG_RESULT, Some(other)) => {
                    trace!(waiting = id, got = other, "buffering out-of-order result");
                    self.pending.insert(other, envelope);
                }
                // Events, pongs, and anything unaddressed: not ours to keep.
                (kind, _) => trace!(kind, "skipping non-result frame"),
            }
        }
    }

    async fn read_envelope(&mut self) -> Result<Envelope, Error> {
        loop {
            let text = next_text(&mut self.stream, self.timeout).await?;
            match serde_json::from_str::<Envelope>(&text) {
                Ok(envelope) => return Ok(envelope),
                Err(e) => {
                    // A frame we can't parse may still be followed by the
                    // one we want; log it and keep reading.
                    warn!(error = %e, "unparsable frame on RPC channel");
                }
            }
        }
    }
}

// ── Handshake ────────────────────────────────────────────────────────

async fn authenticate<S: MessageTransport>(
    stream: &mut S,
    token: &SecretString,
    timeout: Duration,
) -> Result<(), Error> {
    let text = next_text(stream, timeout).await?;
    let first: Envelope = serde_json::from_str(&text).map_err(|e| Error::Deserialization {
        message: format!("handshake frame: {e}"),
        body: text.clone(),
    })?;

    if first.kind != MSG_AUTH_REQUIRED {
        return Err(Error::Authentication {
            message: format!("expected auth_required, peer sent '{}'", first.kind),
        });
    }

    let auth = json!({ "type": "auth", "access_token": token.expose_secret() });
    stream
        .send(Message::text(auth.to_string()))
        .await
        .map_err(|e| Error::WebSocket(e.to_string()))?;

    let text = next_text(stream, timeout).await?;
    let reply: Envelope = serde_json::from_str(&text).map_err(|e| Error::Deserialization {
        message: format!("handshake frame: {e}"),
        body: text.clone(),
    })?;

    match reply.kind.as_str() {
        MSG_AUTH_OK => Ok(()),
        MSG_AUTH_INVALID => Err(Error::Authentication {
            message: reply
                .message
                .unwrap_or_else(|| "access token rejected".into()),
        }),
        other => Err(Error::Authentication {
            message: format!("expected auth_ok, peer sent '{other}'"),
        }),
    }
}

// ── Frame reading ────────────────────────────────────────────────────

/// Read the next text frame, bounded by `timeout`.
///
/// Control frames are handled inline: pings are answered by tungstenite,
/// a close frame or end-of-stream surfaces as [`Error::ChannelClosed`].
async fn next_text<S: MessageTransport>(stream: &mut S, timeout: Duration) -> Result<String, Error> {
    loop {
        let frame = tokio::time::timeout(timeout, stream.next())
            .await
            .map_err(|_| Error::Timeout {
                timeout_secs: timeout.as_secs(),
            })?;

        match frame {
            Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
            Some(Ok(Message::Close(_))) | None => return Err(Error::ChannelClosed),
            Some(Ok(_)) => {
                // Ping/Pong/Binary -- nothing addressed to us
                trace!("ignoring non-text frame");
            }
            Some(Err(e)) => return Err(Error::WebSocket(e.to_string())),
        }
    }
}

/// Turn a `result` envelope into the caller's value or a remote error.
fn unwrap_result(envelope: Envelope) -> Result<Value, Error> {
    if envelope.success.unwrap_or(false) {
        return Ok(envelope.result.unwrap_or(Value::Null));
    }

    let failure = envelope.error;
    Err(Error::Remote {
        code: failure.as_ref().and_then(RemoteFailure::code_string),
        message: failure
            .and_then(|f| f.message)
            .unwrap_or_else(|| "request failed".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_envelope(raw: Value) -> Envelope {
        serde_json::from_value(raw).expect("valid envelope")
    }

    #[test]
    fn unwrap_success_returns_result() {
        let envelope = result_envelope(json!({
            "type": "result", "id": 1, "success": true,
            "result": [{"entity_id": "remote.living_room"}]
        }));
        let value = unwrap_result(envelope).expect("success");
        assert_eq!(value[0]["entity_id"], "remote.living_room");
    }

    #[test]
    fn unwrap_success_without_body_is_null() {
        let envelope = result_envelope(json!({"type": "result", "id": 3, "success": true}));
        assert_eq!(unwrap_result(envelope).expect("success"), Value::Null);
    }

    #[test]
    fn unwrap_failure_carries_code_and_message() {
        let envelope = result_envelope(json!({
            "type": "result", "id": 2, "success": false,
            "error": {"code": "unknown_command", "message": "no such thing"}
        }));
        match unwrap_result(envelope) {
            Err(Error::Remote { code, message }) => {
                assert_eq!(code.as_deref(), Some("unknown_command"));
                assert_eq!(message, "no such thing");
            }
            other => panic!("expected Remote error, got: {other:?}"),
        }
    }

    #[test]
    fn debug_shows_session_state_not_the_stream() {
        let session = RpcSession {
            stream: (),
            next_id: 4,
            pending: HashMap::new(),
            timeout: Duration::from_secs(10),
        };
        let rendered = format!("{session:?}");
        assert!(rendered.contains("RpcSession"));
        assert!(rendered.contains("next_id: 4"));
        assert!(!rendered.contains("stream"));
    }

    #[test]
    fn numeric_error_code_renders_as_string() {
        let failure = RemoteFailure {
            code: Some(json!(3)),
            message: None,
        };
        assert_eq!(failure.code_string().as_deref(), Some("3"));
    }
}
