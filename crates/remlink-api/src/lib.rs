//! Async transport layer for the home-automation control plane.
//!
//! Two independent channels:
//!
//! - **[`RpcSession`]** — persistent, authenticated WebSocket RPC with
//!   request/response correlation by session-scoped id. Used for
//!   registry queries and anything else on the control plane's
//!   bidirectional channel.
//! - **[`RestClient`]** — one-shot REST calls: the entity-state
//!   snapshot ([`RestClient::fetch_states`]) and service invocation
//!   ([`RestClient::call_service`]).
//!
//! `remlink-core` builds the device-resolution and command logic on top;
//! this crate knows nothing about remotes, only about the wire.

pub mod error;
pub mod rest;
pub mod ws;

pub use error::Error;
pub use rest::{EntityState, RestClient};
pub use ws::{MessageTransport, RpcSession};
