//! `remlink devices` -- list learn-capable remotes.

use owo_colors::OwoColorize;
use secrecy::SecretString;
use tabled::Tabled;

use remlink_api::{RestClient, RpcSession};
use remlink_config::Config;
use remlink_core::{CodeStore, CoreError, DeviceRecord, resolve_devices};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Entity")]
    entity_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Hardware ID")]
    hardware_id: String,
    #[tabled(rename = "Commands")]
    commands: String,
}

impl DeviceRow {
    fn build(record: &DeviceRecord, store: &CodeStore) -> Self {
        let (hardware_id, commands) = match &record.hardware_id {
            None => ("-".to_owned(), "-".to_owned()),
            Some(id) => {
                // A corrupt store file shouldn't take the listing down;
                // the codes command surfaces the real error.
                let count = match store.read_codes(id) {
                    Ok(codes) => codes
                        .values()
                        .map(|commands| commands.len())
                        .sum::<usize>()
                        .to_string(),
                    Err(e) => {
                        tracing::warn!(error = %e, hardware_id = %id, "unreadable command store");
                        "?".to_owned()
                    }
                };
                (id.to_string(), count)
            }
        };

        Self {
            entity_id: record.entity_id.clone(),
            name: record.display_name.clone(),
            hardware_id,
            commands,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: &Config,
    token: &SecretString,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let rest = RestClient::new(config.base_url.clone(), token.clone(), config.timeout())
        .map_err(CoreError::Api)?;

    let ws_url = config.websocket_url()?;
    let mut session = RpcSession::connect(&ws_url, token, config.timeout())
        .await
        .map_err(CoreError::Api)?;

    let records = resolve_devices(&mut session, &rest).await?;

    if let Err(e) = session.close().await {
        tracing::debug!(error = %e, "session close failed");
    }

    if records.is_empty() && global.output == OutputFormat::Table {
        if !global.quiet {
            eprintln!("{}", "No learn-capable remote entities found".yellow());
        }
        return Ok(());
    }

    let store = CodeStore::new(&config.storage_dir);
    let out = output::render_list(
        global.output,
        &records,
        |r| DeviceRow::build(r, &store),
        |r| r.entity_id.clone(),
    );
    output::print_output(&out);
    Ok(())
}
