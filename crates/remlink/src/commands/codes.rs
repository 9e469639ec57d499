//! `remlink codes` -- dump the learned-command store for one device.

use owo_colors::OwoColorize;
use tabled::Tabled;

use remlink_config::Config;
use remlink_core::{CodeStore, CommandMap, HardwareId, InvalidHardwareId};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CodeRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Payload")]
    payload: String,
}

/// Payloads are opaque base64-ish blobs; the table shows a prefix only.
fn payload_preview(value: &serde_json::Value) -> String {
    let rendered = match value.as_str() {
        Some(s) => s.to_owned(),
        None => value.to_string(),
    };
    if rendered.chars().count() > 32 {
        let prefix: String = rendered.chars().take(32).collect();
        format!("{prefix}…")
    } else {
        rendered
    }
}

fn rows(codes: &CommandMap) -> Vec<CodeRow> {
    codes
        .iter()
        .flat_map(|(device, commands)| {
            commands.iter().map(|(command, payload)| CodeRow {
                device: device.clone(),
                command: command.clone(),
                payload: payload_preview(payload),
            })
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(config: &Config, hardware_id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let id: HardwareId = hardware_id
        .parse()
        .map_err(|e: InvalidHardwareId| CliError::Validation {
            field: "hardware_id",
            reason: e.to_string(),
        })?;

    let store = CodeStore::new(&config.storage_dir);
    let codes = store.read_codes(&id)?;

    if codes.is_empty() && global.output == OutputFormat::Table {
        if !global.quiet {
            eprintln!("{}", format!("No learned commands for {id} yet").yellow());
        }
        return Ok(());
    }

    let out = match global.output {
        OutputFormat::Table => output::render_table(&rows(&codes)),
        OutputFormat::Plain => codes
            .iter()
            .flat_map(|(device, commands)| {
                commands.keys().map(move |command| format!("{device}/{command}"))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        format => output::render_single(format, &codes, |_| String::new()),
    };
    output::print_output(&out);
    Ok(())
}
