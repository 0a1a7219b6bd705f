//! vhdscan CLI library
//!
//! The `vhdscan` binary is a thin wrapper over [`run`]; the modules are public
//! so that argument parsing, source resolution and report rendering can be
//! exercised by integration tests.
//!
//! # Module Structure
//!
//! - [`cli`]: clap argument definitions
//! - [`commands`]: one handler per subcommand (`inventory`, `scan`, `config`)
//! - [`error`]: `CliError` and exit code mapping
//! - [`logging`]: tracing subscriber initialization (stderr)
//! - [`output`]: text / JSON rendering (`OutputWriter`, `Render`)
//! - [`source`]: `SOURCE` argument resolution (file path or stdin)

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod source;

use vhdscan_core::config::{GeneralConfig, VhdscanConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Log levels accepted by `--log-level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Run a parsed command line.
///
/// Configuration is loaded once (defaults, then file, then environment, then
/// CLI flags). `config` subcommands report configuration errors themselves, so
/// a broken file only aborts the other commands.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let loaded = VhdscanConfig::load_or_default(&cli.config).await;

    let general = match &loaded {
        Ok(config) => config.general.clone(),
        Err(_) => GeneralConfig::default(),
    };
    let general = apply_log_level_flag(general, cli.log_level.as_deref())?;
    logging::init_tracing(&general)?;

    tracing::debug!(config = %cli.config.display(), "vhdscan starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
        Commands::Inventory(args) => {
            let config = loaded?;
            commands::inventory::execute(args, &config, &writer).await
        }
        Commands::Scan(args) => {
            let config = loaded?;
            commands::scan::execute(args, &config, &writer).await
        }
    }
}

/// Apply the `--log-level` flag on top of the configured level.
pub fn apply_log_level_flag(
    mut general: GeneralConfig,
    flag: Option<&str>,
) -> Result<GeneralConfig, CliError> {
    if let Some(level) = flag {
        let level = level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(CliError::Config(format!(
                "invalid log level '{level}', expected one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }
        general.log_level = level;
    }
    Ok(general)
}
