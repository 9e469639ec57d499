//! Learned-command store reader.
//!
//! The external learning service persists captured IR/RF payloads in a
//! per-device JSON file whose name is derived from the hardware
//! identifier. This side only reads: payloads are opaque and pass
//! through unmodified, and deletion happens indirectly through the
//! platform's delete-command service, never by touching the file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::model::HardwareId;

/// Learned commands on disk: device-name → command-name → payload.
pub type CommandMap = BTreeMap<String, BTreeMap<String, Value>>;

/// On-disk document shape: `{"data": {"devices": {...}}}` plus fields
/// (version, key) that belong to the writing service and are ignored.
#[derive(Debug, Deserialize)]
struct StoreFile {
    #[serde(default)]
    data: StoreData,
}

#[derive(Debug, Default, Deserialize)]
struct StoreData {
    #[serde(default)]
    devices: CommandMap,
}

/// Reader for the per-device learned-command files in one directory
/// (the platform's `.storage` directory in production).
pub struct CodeStore {
    dir: PathBuf,
}

impl CodeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Deterministic file path for one hardware identifier.
    ///
    /// The platform writes these files with lowercase hex in the name;
    /// the identifier itself stays uppercase everywhere else.
    pub fn path_for(&self, hardware_id: &HardwareId) -> PathBuf {
        self.dir.join(format!(
            "broadlink_remote_{}_codes",
            hardware_id.as_str().to_ascii_lowercase()
        ))
    }

    /// Read the learned commands for one device.
    ///
    /// An absent file is the legitimate "nothing learned yet" state and
    /// returns an empty mapping. A present but unparsable file -- which
    /// can happen transiently while the learning service is mid-write --
    /// fails with [`CoreError::CorruptStore`] naming the path.
    pub fn read_codes(&self, hardware_id: &HardwareId) -> Result<CommandMap, CoreError> {
        let path = self.path_for(hardware_id);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no learned-command store yet");
                return Ok(CommandMap::new());
            }
            Err(e) => return Err(CoreError::Io { path, source: e }),
        };

        let file: StoreFile = serde_json::from_str(&raw)
            .map_err(|e| CoreError::CorruptStore { path, source: e })?;

        Ok(file.data.devices)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
