//! Command handlers -- one module per subcommand

pub mod config;
pub mod inventory;
pub mod scan;

use vhdscan_core::config::VhdscanConfig;
use vhdscan_inventory::{InventoryParser, InventoryParserConfig};

use crate::error::CliError;

/// Build an inventory parser from the `[inventory]` section.
pub(crate) fn build_parser(config: &VhdscanConfig) -> Result<InventoryParser, CliError> {
    let parser_config = InventoryParserConfig::from_core(&config.inventory);
    Ok(InventoryParser::with_config(parser_config)?)
}
