// ── Core identity and record types ──
//
// HardwareId is the foundation of the learned-command store lookup:
// a normalized, separator-free, uppercase MAC-like identifier. Every
// resolved device carries one (or explicitly lacks one).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use remlink_api::EntityState;

// ── HardwareId ──────────────────────────────────────────────────────

/// Normalized hardware identifier: exactly 12 uppercase hex digits,
/// no separators. Invariant held by construction -- both the parsing
/// constructor and deserialization go through the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct HardwareId(String);

/// Raised when a string cannot be normalized into a [`HardwareId`].
#[derive(Debug, Error)]
#[error("not a hardware identifier (want 12 hex digits): {0:?}")]
pub struct InvalidHardwareId(pub String);

impl HardwareId {
    /// Normalize a MAC-style string: strip `:`/`-`/`.` separators,
    /// uppercase, require exactly 12 hex digits.
    ///
    /// Returns `None` for anything else -- registry entries whose
    /// unique id is not MAC-shaped simply have no hardware identity.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let stripped: String = raw
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();

        if stripped.len() == 12 && stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(stripped.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HardwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HardwareId {
    type Err = InvalidHardwareId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_raw(s).ok_or_else(|| InvalidHardwareId(s.to_owned()))
    }
}

impl TryFrom<String> for HardwareId {
    type Error = InvalidHardwareId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ── RegistryEntry ───────────────────────────────────────────────────

/// One row of the platform's entity registry, verbatim from the RPC
/// channel. Only the fields the resolver consumes are modeled; the
/// registry carries plenty more.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    pub entity_id: String,

    #[serde(default)]
    pub unique_id: Option<String>,

    /// User-assigned name, when the operator renamed the entity.
    #[serde(default)]
    pub name: Option<String>,

    /// Name the integration registered the entity under.
    #[serde(default)]
    pub original_name: Option<String>,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub device_id: Option<String>,
}

impl RegistryEntry {
    /// The domain prefix of `entity_id` (`"remote"` for `remote.x`).
    pub fn domain(&self) -> &str {
        self.entity_id.split('.').next().unwrap_or("")
    }

    /// Best display name: user-assigned, else integration-assigned,
    /// else the entity id itself.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.original_name.as_deref())
            .unwrap_or(&self.entity_id)
    }

    /// Extract the hardware identifier from the entry's unique-id data,
    /// when it is MAC-shaped. Entries without one are still resolvable
    /// devices -- they just cannot be looked up in the command store.
    pub fn hardware_id(&self) -> Option<HardwareId> {
        HardwareId::from_raw(self.unique_id.as_deref()?)
    }
}

// ── DeviceRecord ────────────────────────────────────────────────────

/// One controllable remote-entity with its resolved hardware identity.
///
/// Built per resolution pass, never persisted, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    /// Unique entity id in `domain.object_id` form.
    pub entity_id: String,

    pub display_name: String,

    /// Absent when the registry carried no MAC-shaped identifier;
    /// such devices cannot be looked up in the learned-command store.
    pub hardware_id: Option<HardwareId>,
}

impl DeviceRecord {
    /// The `object_id` half of the entity id.
    pub fn object_id(&self) -> &str {
        self.entity_id
            .split_once('.')
            .map_or(self.entity_id.as_str(), |(_, object)| object)
    }
}
