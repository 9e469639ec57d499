//! `remlink learn` / `remlink forget` -- learn-mode and deletion.

use owo_colors::OwoColorize;
use secrecy::SecretString;

use remlink_api::RestClient;
use remlink_config::Config;
use remlink_core::{CoreError, begin_learn, delete_command};

use crate::cli::GlobalOpts;
use crate::error::CliError;

fn rest_client(config: &Config, token: &SecretString) -> Result<RestClient, CliError> {
    RestClient::new(config.base_url.clone(), token.clone(), config.timeout())
        .map_err(CoreError::Api)
        .map_err(CliError::from)
}

/// Request learning mode. The platform accepts immediately; the actual
/// capture happens while the operator points the remote at the device.
pub async fn handle_learn(
    config: &Config,
    token: &SecretString,
    global: &GlobalOpts,
    entity_id: &str,
    device: &str,
    command: &str,
) -> Result<(), CliError> {
    let rest = rest_client(config, token)?;
    begin_learn(&rest, entity_id, device, command).await?;

    if !global.quiet {
        eprintln!(
            "{} Point the remote at the device and press the button for '{}/{}'.",
            "Learning mode requested.".green(),
            device,
            command
        );
    }
    Ok(())
}

/// Request deletion of a learned command. Acceptance, not durability:
/// `remlink codes` re-reads the store for confirmation.
pub async fn handle_forget(
    config: &Config,
    token: &SecretString,
    global: &GlobalOpts,
    entity_id: &str,
    device: &str,
    command: &str,
) -> Result<(), CliError> {
    let rest = rest_client(config, token)?;
    delete_command(&rest, entity_id, device, command).await?;

    if !global.quiet {
        eprintln!(
            "{} Run 'remlink codes' to confirm '{}/{}' is gone.",
            "Delete requested.".green(),
            device,
            command
        );
    }
    Ok(())
}
