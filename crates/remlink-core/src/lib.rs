//! Domain layer between `remlink-api` and UI consumers (CLI).
//!
//! This crate owns the business logic for remote-control device
//! management:
//!
//! - **[`resolver`]** — joins the entity registry (RPC channel) with the
//!   state snapshot (REST) into [`DeviceRecord`]s, applying the named
//!   learn-capability policy from [`capability`].
//! - **[`CodeStore`]** — reads the per-device learned-command files the
//!   external learning service maintains on disk.
//! - **[`commands`]** — learn-mode activation and command deletion via
//!   service invocation, with upfront validation.
//! - **[`automation`]** — pure synthesis of automation YAML from an
//!   entity id and command name.
//!
//! Sessions and clients are constructed by the caller and passed in, so
//! every operation here is testable against a mock transport.

pub mod automation;
pub mod capability;
pub mod commands;
pub mod error;
pub mod model;
pub mod resolver;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use automation::synthesize;
pub use commands::{begin_learn, delete_command};
pub use error::CoreError;
pub use model::{DeviceRecord, EntityState, HardwareId, InvalidHardwareId, RegistryEntry};
pub use resolver::{REMOTE_DOMAIN, join_records, resolve_devices};
pub use store::{CodeStore, CommandMap};
