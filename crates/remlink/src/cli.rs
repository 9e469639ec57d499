//! Clap derive structures for the `remlink` CLI.
//!
//! Defines the command tree, global flags, and output format options.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// remlink -- manage learned IR/RF remote commands from the command line
#[derive(Debug, Parser)]
#[command(
    name = "remlink",
    version,
    about = "Discover remote-control hardware and manage learned IR/RF commands",
    long_about = "Talks to a home-automation platform over its WebSocket RPC channel\n\
        and REST API to list learn-capable remotes, inspect their on-disk\n\
        learned-command stores, trigger learning mode, and generate automation\n\
        snippets for freshly learned commands.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Platform base URL (overrides config)
    #[arg(long, short = 'u', env = "REMLINK_BASE_URL", global = true)]
    pub base_url: Option<Url>,

    /// Access token (falls back to SUPERVISOR_TOKEN)
    #[arg(long, env = "REMLINK_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Directory holding the learned-command store files
    #[arg(long, env = "REMLINK_STORAGE_DIR", global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, short = 't', global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List learn-capable remote devices with their hardware identity
    Devices,

    /// Show the learned commands stored for one device
    Codes {
        /// Hardware identifier (12 hex digits; separators accepted)
        hardware_id: String,
    },

    /// Put a device into learning mode for a new command
    Learn {
        /// Target entity (e.g. remote.living_room)
        entity_id: String,
        /// Device name the command is filed under (e.g. tv)
        device: String,
        /// Command name to learn (e.g. power_on)
        command: String,
    },

    /// Delete a previously learned command
    Forget {
        /// Target entity (e.g. remote.living_room)
        entity_id: String,
        /// Device name the command is filed under
        device: String,
        /// Command name to delete
        command: String,
    },

    /// Print an automation snippet reacting to a learned command
    Automation {
        /// Target entity (e.g. remote.living_room)
        entity_id: String,
        /// Command name the automation should send
        command: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ── Output format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// One identifier per line
    Plain,
}
