//! CLI-specific error types and exit code mapping

use vhdscan_core::error::{ParseError, VhdscanError};
use vhdscan_inventory::InventoryError;
use vhdscan_vuln::VulnScanError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The input source cannot be read by this tool (e.g. a URL).
    #[error("unsupported source '{source_name}': {reason}")]
    UnsupportedSource { source_name: String, reason: String },

    /// `scan --fail-on-vulns` found active vulnerabilities.
    #[error("found {0} active vulnerabilities")]
    VulnerabilitiesFound(usize),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from vhdscan-core.
    #[error("{0}")]
    Core(#[from] VhdscanError),

    /// Inventory parser domain error.
    #[error("{0}")]
    Inventory(#[from] InventoryError),

    /// Vulnerability evaluation domain error.
    #[error("scan error: {0}")]
    Vuln(#[from] VulnScanError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration error                       |
    /// | 3    | No recognizable section in the build log  |
    /// | 4    | Active vulnerabilities (`--fail-on-vulns`)|
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::VulnerabilitiesFound(_) => 4,
            Self::Io(_) => 10,
            Self::Core(e) => match e {
                VhdscanError::Config(_) => 2,
                VhdscanError::Parse(ParseError::NoContent) => 3,
                VhdscanError::Io(_) => 10,
                VhdscanError::Parse(_) | VhdscanError::Advisory(_) => 1,
            },
            Self::Inventory(e) => match e {
                InventoryError::NoContent => 3,
                InventoryError::Read { .. } => 10,
                InventoryError::Config { .. } => 2,
                InventoryError::LineTooLong { .. }
                | InventoryError::EmptySourceName
                | InventoryError::Pattern(_) => 1,
            },
            Self::JsonSerialize(_)
            | Self::Command(_)
            | Self::UnsupportedSource { .. }
            | Self::Vuln(_) => 1,
        }
    }
}
