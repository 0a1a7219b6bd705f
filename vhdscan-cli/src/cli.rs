//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// vhdscan -- VHD build log inventory and vulnerability report.
///
/// Use `vhdscan <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "vhdscan", version, about, long_about = None)]
pub struct Cli {
    /// Path to the vhdscan.toml configuration file (defaults are used if it does not exist).
    #[arg(short, long, global = true, default_value = "vhdscan.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a build log and print the extracted inventory.
    Inventory(InventoryArgs),

    /// Parse a build log and report packages with active vulnerabilities.
    Scan(ScanArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- inventory ----

/// Parse a build log and print packages, container images and OS identity.
#[derive(Args, Debug)]
pub struct InventoryArgs {
    /// Build log file path, or `-` for stdin.
    pub source: String,
}

// ---- scan ----

/// Parse a build log and evaluate its packages against the advisory database.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Build log file path, or `-` for stdin.
    pub source: String,

    /// Advisory database directory (overrides `[vuln] db_path`).
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Exit with code 4 when active vulnerabilities are found.
    #[arg(long)]
    pub fail_on_vulns: bool,
}

// ---- config ----

/// Manage vhdscan configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, inventory, vuln).
        #[arg(long)]
        section: Option<String>,
    },
}
