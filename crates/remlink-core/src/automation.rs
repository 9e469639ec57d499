//! Automation snippet synthesis.
//!
//! Pure, deterministic construction of a declarative automation
//! fragment from an entity id and a command name. No I/O: the caller
//! (CLI, UI) decides where the YAML ends up.

use serde::Serialize;

use crate::error::CoreError;

// ── Snippet shape ───────────────────────────────────────────────────

#[derive(Serialize)]
struct Snippet<'a> {
    id: String,
    alias: String,
    trigger: Vec<Trigger<'a>>,
    action: Vec<Action<'a>>,
    mode: &'static str,
}

#[derive(Serialize)]
struct Trigger<'a> {
    platform: &'static str,
    entity_id: &'a str,
}

#[derive(Serialize)]
struct Action<'a> {
    service: &'static str,
    target: Target<'a>,
    data: ActionData<'a>,
}

#[derive(Serialize)]
struct Target<'a> {
    entity_id: &'a str,
}

#[derive(Serialize)]
struct ActionData<'a> {
    command: &'a str,
}

// ── Synthesis ───────────────────────────────────────────────────────

/// Build an automation YAML fragment reacting to `entity_id` with
/// `command`: a stable slugged `id`, a human-readable alias, a state
/// trigger on the entity, and a `remote.send_command` action sending
/// the raw command name back at the same entity.
///
/// The raw-name → slug mapping is total but not injective ("power on"
/// and "power_on" produce the same fragment). Tolerated: the entity
/// slug prefix keeps collisions within a single device, and the
/// platform de-duplicates automations by id.
pub fn synthesize(entity_id: &str, command: &str) -> Result<String, CoreError> {
    if entity_id.trim().is_empty() {
        return Err(CoreError::Validation {
            field: "entity_id",
            reason: "must not be empty".into(),
        });
    }
    if command.trim().is_empty() {
        return Err(CoreError::Validation {
            field: "command",
            reason: "must not be empty".into(),
        });
    }

    let object_id = entity_id
        .split_once('.')
        .map_or(entity_id, |(_, object)| object);

    let snippet = Snippet {
        id: format!("{}_{}", slug(entity_id), slug(command)),
        alias: format!("{} - {}", humanize(object_id), humanize(command)),
        trigger: vec![Trigger {
            platform: "state",
            entity_id,
        }],
        action: vec![Action {
            service: "remote.send_command",
            target: Target { entity_id },
            data: ActionData { command },
        }],
        mode: "single",
    };

    Ok(serde_yaml::to_string(&snippet)?)
}

/// Total mapping from a raw name to an identifier fragment: lowercase,
/// non-alphanumeric runs collapse to a single `_`, edges trimmed.
fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut gap = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('_');
            }
            gap = false;
            out.push(c.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    out
}

/// Human-readable form: words split on non-alphanumerics, first letter
/// of each capitalized ("power_on" → "Power On").
fn humanize(raw: &str) -> String {
    raw.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
