use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `remlink-core` crate.
///
/// Transport-level failures from `remlink-api` pass through; everything
/// the domain layer adds (resolution joins, the on-disk store, caller
/// input validation) gets its own variant with enough context to act on.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A transport or peer failure, unchanged from the API layer.
    #[error(transparent)]
    Api(#[from] remlink_api::Error),

    /// The registry + snapshot join could not complete.
    ///
    /// Either source failing fails the whole pass -- a half-joined
    /// device list would silently hide devices from the operator.
    #[error("Device resolution failed while fetching the {operation}")]
    Resolution {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The learned-command store file exists but is not parsable.
    ///
    /// Can happen transiently while the external learning service is
    /// mid-write; callers may simply retry the read.
    #[error("Learned-command store {} is not valid JSON", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading the store file failed for a reason other than absence.
    #[error("Could not read learned-command store {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Caller-supplied parameters were malformed or missing. Raised
    /// before any network call is made.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// YAML rendering of an automation snippet failed.
    #[error("Could not render automation snippet")]
    Render(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Returns `true` if the underlying cause is an authentication
    /// rejection (useful for exit-code mapping in the CLI).
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Api(e) => e.is_auth(),
            Self::Resolution { source, .. } => source
                .downcast_ref::<remlink_api::Error>()
                .is_some_and(remlink_api::Error::is_auth),
            _ => false,
        }
    }
}
