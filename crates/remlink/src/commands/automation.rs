//! `remlink automation` -- print a generated automation snippet.

use remlink_core::synthesize;

use crate::error::CliError;

/// Pure and offline: no session, no snapshot, just the YAML on stdout
/// ready to paste into the platform's automation file.
pub fn handle(entity_id: &str, command: &str) -> Result<(), CliError> {
    let snippet = synthesize(entity_id, command)?;
    print!("{snippet}");
    Ok(())
}
