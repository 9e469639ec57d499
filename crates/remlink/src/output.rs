//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, plain emits one identifier
//! per line.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::OutputFormat;

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: builds a row per item via `to_row`
/// - `json` / `yaml`: serializes the original data via serde
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable value; `table` falls back to a
/// pre-formatted detail string from `detail_fn`.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table | OutputFormat::Plain => detail_fn(data),
        OutputFormat::Json => render_json(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Render rows as a table, or nothing when there are no rows.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

// `?Sized` so slices can be serialized without an intermediate Vec.
fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("serialization error: {e}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("serialization error: {e}"))
}

/// Print rendered output, skipping empty strings.
pub fn print_output(out: &str) {
    if !out.is_empty() {
        println!("{out}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Item {
        name: String,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { name: "tv".into() },
            Item { name: "soundbar".into() },
        ]
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(
            OutputFormat::Plain,
            &items(),
            |i| Row { name: i.name.clone() },
            |i| i.name.clone(),
        );
        assert_eq!(out, "tv\nsoundbar");
    }

    #[test]
    fn json_serializes_original_data() {
        let out = render_list(
            OutputFormat::Json,
            &items(),
            |i| Row { name: i.name.clone() },
            |i| i.name.clone(),
        );
        assert!(out.contains("\"name\": \"tv\""));
    }

    #[test]
    fn yaml_serializes_original_data() {
        let out = render_list(
            OutputFormat::Yaml,
            &items(),
            |i| Row { name: i.name.clone() },
            |i| i.name.clone(),
        );
        assert!(out.contains("name: tv"));
        assert!(out.contains("name: soundbar"));
    }

    #[test]
    fn empty_table_renders_nothing() {
        let out = render_list(
            OutputFormat::Table,
            &Vec::<Item>::new(),
            |i| Row { name: i.name.clone() },
            |i| i.name.clone(),
        );
        assert!(out.is_empty());
    }
}
