//! Learn-mode activation and command deletion.
//!
//! Thin validation layer over the platform's remote-control services.
//! Both operations are fire-and-accept: success means the platform took
//! the request, not that the physical action finished. Neither is
//! retried here -- re-entering learning mode or re-issuing a delete has
//! real-world side effects, so retry policy belongs to the caller.

use serde_json::json;
use tracing::info;

use remlink_api::RestClient;

use crate::error::CoreError;
use crate::resolver::REMOTE_DOMAIN;

const LEARN_SERVICE: &str = "learn_command";
const DELETE_SERVICE: &str = "delete_command";

/// Put the entity into learning mode for one device/command pair.
///
/// Returns as soon as the platform accepts the call; the entity's state
/// transitions asynchronously while the operator points the physical
/// remote at the hardware.
pub async fn begin_learn(
    rest: &RestClient,
    entity_id: &str,
    device: &str,
    command: &str,
) -> Result<(), CoreError> {
    validate(entity_id, device, command)?;

    info!(entity_id, device, command, "entering learn mode");

    rest.call_service(
        REMOTE_DOMAIN,
        LEARN_SERVICE,
        &json!({ "entity_id": entity_id, "device": device, "command": command }),
    )
    .await?;
    Ok(())
}

/// Ask the platform to delete a previously learned command.
///
/// Acceptance, not durability: callers needing confirmation should
/// re-read the store afterwards.
pub async fn delete_command(
    rest: &RestClient,
    entity_id: &str,
    device: &str,
    command: &str,
) -> Result<(), CoreError> {
    validate(entity_id, device, command)?;

    info!(entity_id, device, command, "deleting learned command");

    rest.call_service(
        REMOTE_DOMAIN,
        DELETE_SERVICE,
        &json!({ "entity_id": entity_id, "device": device, "command": command }),
    )
    .await?;
    Ok(())
}

/// All three fields are required; fail fast before any network call.
fn validate(entity_id: &str, device: &str, command: &str) -> Result<(), CoreError> {
    required("entity_id", entity_id)?;
    required("device", device)?;
    required("command", command)?;

    if !entity_id.contains('.') {
        return Err(CoreError::Validation {
            field: "entity_id",
            reason: format!("expected domain.object_id form, got {entity_id:?}"),
        });
    }
    Ok(())
}

fn required(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_well_formed_fields() {
        assert!(validate("remote.living_room", "tv", "power_on").is_ok());
    }

    #[test]
    fn validate_rejects_empty_fields() {
        for (entity, device, command, want) in [
            ("", "tv", "power_on", "entity_id"),
            ("remote.a", "  ", "power_on", "device"),
            ("remote.a", "tv", "", "command"),
        ] {
            match validate(entity, device, command) {
                Err(CoreError::Validation { field, .. }) => assert_eq!(field, want),
                other => panic!("expected Validation error for {want}, got: {other:?}"),
            }
        }
    }

    #[test]
    fn validate_rejects_domainless_entity_id() {
        let result = validate("living_room", "tv", "power_on");
        assert!(
            matches!(result, Err(CoreError::Validation { field: "entity_id", .. })),
            "got: {result:?}"
        );
    }
}
