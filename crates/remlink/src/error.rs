//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and config failures into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use remlink_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Configuration error")]
    #[diagnostic(
        code(remlink::config),
        help(
            "Set SUPERVISOR_TOKEN (or REMLINK_TOKEN) and REMLINK_BASE_URL,\n\
             or create a config file -- see `remlink --help` for the flags."
        )
    )]
    Config(#[from] remlink_config::ConfigError),

    #[error(transparent)]
    #[diagnostic(code(remlink::operation))]
    Core(#[from] CoreError),

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(remlink::usage))]
    Validation { field: &'static str, reason: String },
}

impl CliError {
    /// Map the failure onto a stable process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::USAGE,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Core(core) => {
                if core.is_auth() {
                    return exit_code::AUTH;
                }
                match core {
                    CoreError::Api(remlink_api::Error::Timeout { .. }) => exit_code::TIMEOUT,
                    CoreError::Api(api) if api.is_transport() => exit_code::CONNECTION,
                    CoreError::Validation { .. } => exit_code::USAGE,
                    _ => exit_code::GENERAL,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_usage() {
        let err = CliError::Validation {
            field: "hardware_id",
            reason: "nope".into(),
        };
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn auth_failure_maps_to_auth() {
        let err = CliError::Core(CoreError::Api(remlink_api::Error::Authentication {
            message: "rejected".into(),
        }));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn timeout_maps_to_timeout() {
        let err = CliError::Core(CoreError::Api(remlink_api::Error::Timeout {
            timeout_secs: 10,
        }));
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn channel_closed_maps_to_connection() {
        let err = CliError::Core(CoreError::Api(remlink_api::Error::ChannelClosed));
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }
}
