//! `vhdscan inventory` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use vhdscan_core::config::VhdscanConfig;
use vhdscan_inventory::Inventory;

use crate::cli::InventoryArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::source::InputSource;

use super::build_parser;

/// Execute the `inventory` command.
pub async fn execute(
    args: InventoryArgs,
    config: &VhdscanConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = InputSource::parse(&args.source)?;
    let parser = build_parser(config)?;

    info!(source = %source, "extracting inventory");
    let inventory = source.read_inventory(parser).await?;

    let report = InventoryReport {
        source: source.to_string(),
        inventory,
    };
    writer.render(&report)?;

    Ok(())
}

/// Inventory output payload.
#[derive(Serialize)]
pub struct InventoryReport {
    /// Build log source (file path or `<stdin>`)
    pub source: String,
    #[serde(flatten)]
    pub inventory: Inventory,
}

impl Render for InventoryReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let inv = &self.inventory;

        writeln!(w, "Source: {}", self.source.bold())?;
        writeln!(w, "Distribution: {}", inv.distro)?;
        writeln!(
            w,
            "Package lines: {} apt, {} rpm",
            inv.format_counts.apt, inv.format_counts.rpm
        )?;

        writeln!(w)?;
        writeln!(w, "=== OS Info ===")?;
        match &inv.os_release {
            Some(os) => {
                writeln!(w, "Name: {}", os.name)?;
                writeln!(w, "ID: {}", os.id)?;
                writeln!(w, "Version: {} ({})", os.version, os.version_id)?;
                writeln!(w, "Pretty name: {}", os.pretty_name)?;
            }
            None => writeln!(w, "{}", "No OS release info found.".yellow())?,
        }

        writeln!(w)?;
        writeln!(w, "=== Container Images ===")?;
        if inv.container_images.is_empty() {
            writeln!(w, "{}", "No container images found.".dimmed())?;
        }
        for image in &inv.container_images {
            writeln!(w, "{image}")?;
        }

        writeln!(w)?;
        writeln!(w, "=== Packages ({}) ===", inv.packages.len())?;
        if !inv.packages.is_empty() {
            writeln!(w, "{:<40} Version", "Name")?;
            writeln!(w, "{}", "-".repeat(72))?;
        }
        for pkg in &inv.packages {
            writeln!(w, "{:<40} {}", pkg.name, pkg.version)?;
        }

        Ok(())
    }
}
