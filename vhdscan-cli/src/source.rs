//! Input source resolution -- file path or stdin
//!
//! The `SOURCE` argument is either a file path or `-` for stdin.
//! `http://` and `https://` sources are recognized and rejected: fetching build
//! logs over the network is left to the caller (e.g. `curl ... | vhdscan scan -`).

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use vhdscan_inventory::{Inventory, InventoryParser};

use crate::error::CliError;

/// Source name reported in errors for stdin input.
pub const STDIN_NAME: &str = "<stdin>";

/// A resolved build log source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input (`-`).
    Stdin,
    /// Local file.
    File(PathBuf),
}

impl InputSource {
    /// Resolve a `SOURCE` argument.
    ///
    /// # Errors
    ///
    /// Returns `CliError::UnsupportedSource` for URLs and `CliError::Command`
    /// for an empty argument.
    pub fn parse(arg: &str) -> Result<Self, CliError> {
        if arg.is_empty() {
            return Err(CliError::Command("source cannot be empty".to_owned()));
        }
        if arg == "-" {
            return Ok(Self::Stdin);
        }
        if is_url(arg) {
            return Err(CliError::UnsupportedSource {
                source_name: arg.to_owned(),
                reason: "fetching remote build logs is not supported; download the log \
                         and pass the file path, or pipe it to `-`"
                    .to_owned(),
            });
        }
        Ok(Self::File(PathBuf::from(arg)))
    }

    /// Parse the source into an inventory.
    ///
    /// File and stdin reads are blocking, so parsing runs on the blocking pool.
    pub async fn read_inventory(&self, parser: InventoryParser) -> Result<Inventory, CliError> {
        debug!(source = %self, "reading build log");
        let source = self.clone();
        let result = tokio::task::spawn_blocking(move || match source {
            Self::Stdin => {
                let stdin = std::io::stdin();
                parser.parse_named(stdin.lock(), STDIN_NAME)
            }
            Self::File(path) => parser.parse_file(&path),
        })
        .await
        .map_err(|e| CliError::Command(format!("inventory parse task failed: {e}")))?;

        Ok(result?)
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str(STDIN_NAME),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_url(arg: &str) -> bool {
    let lower = arg.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
