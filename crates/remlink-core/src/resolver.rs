//! Registry + snapshot join producing the authoritative device list.
//!
//! Two independently-sourced datasets go in: the entity registry (over
//! the RPC channel) and the full state snapshot (over REST). Out comes
//! an ordered list of [`DeviceRecord`]s for every learn-capable remote
//! entity present in both. Each pass re-fetches both sources; the
//! window of inconsistency between the two fetches is accepted rather
//! than papered over with caching.

use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, trace};

use remlink_api::{EntityState, MessageTransport, RestClient, RpcSession};

use crate::capability;
use crate::error::CoreError;
use crate::model::{DeviceRecord, RegistryEntry};

/// Domain prefix of remote-control entities.
pub const REMOTE_DOMAIN: &str = "remote";

/// RPC command that returns the full entity registry.
const ENTITY_REGISTRY_LIST: &str = "config/entity_registry/list";

/// Fetch both sources and join them into device records.
///
/// If either fetch fails the whole pass fails with
/// [`CoreError::Resolution`] -- a partial list from a half-failed join
/// is never returned.
pub async fn resolve_devices<S: MessageTransport>(
    session: &mut RpcSession<S>,
    rest: &RestClient,
) -> Result<Vec<DeviceRecord>, CoreError> {
    let raw = session
        .call(ENTITY_REGISTRY_LIST, json!({}))
        .await
        .map_err(|e| CoreError::Resolution {
            operation: "entity registry",
            source: Box::new(e),
        })?;

    let entries: Vec<RegistryEntry> =
        serde_json::from_value(raw).map_err(|e| CoreError::Resolution {
            operation: "entity registry",
            source: Box::new(e),
        })?;

    let states = rest
        .fetch_states()
        .await
        .map_err(|e| CoreError::Resolution {
            operation: "state snapshot",
            source: Box::new(e),
        })?;

    debug!(
        registry_entries = entries.len(),
        snapshot_entities = states.len(),
        "joining registry and snapshot"
    );

    Ok(join_records(&entries, &states))
}

/// Pure join: registry iteration order, remote-domain entries only,
/// snapshot presence required, capability policy applied.
///
/// Entries without a resolvable hardware identifier are retained with
/// `hardware_id: None` -- absence means "cannot look up learned
/// commands", not "not a device".
pub fn join_records(
    entries: &[RegistryEntry],
    states: &HashMap<String, EntityState>,
) -> Vec<DeviceRecord> {
    entries
        .iter()
        .filter_map(|entry| {
            if entry.domain() != REMOTE_DOMAIN {
                return None;
            }

            // Registered but absent from the snapshot: the entity is
            // not live right now, so it is excluded from this pass.
            let state = states.get(&entry.entity_id)?;

            if !capability::supports_learning(state.supported_features()) {
                trace!(
                    entity_id = %entry.entity_id,
                    features = state.supported_features(),
                    "remote entity is not learn-capable, skipping"
                );
                return None;
            }

            let hardware_id = entry.hardware_id();
            if hardware_id.is_none() {
                debug!(
                    entity_id = %entry.entity_id,
                    unique_id = ?entry.unique_id,
                    "no resolvable hardware identifier, retaining without one"
                );
            }

            Some(DeviceRecord {
                entity_id: entry.entity_id.clone(),
                display_name: entry.display_name().to_owned(),
                hardware_id,
            })
        })
        .collect()
}
