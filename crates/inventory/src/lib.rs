#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`InventoryError`)
//! - [`config`]: Parser configuration (`InventoryParserConfig`, builder)
//! - [`types`]: Parse result types (`Inventory`, `ContainerImage`, `PackageFormat`, `FormatCounts`)
//! - [`classifier`]: Line classifiers (`PackageClassifier`, os-release, container images)
//! - [`section`]: Marker-driven section state machine (`SectionTracker`)
//! - [`distro`]: Distribution detection from os-release and format counters
//! - [`parser`]: Single-pass scan driver (`InventoryParser`)
//!
//! # Architecture
//!
//! ```text
//! BufRead --> line split --> SectionTracker --+--> PackageClassifier --> packages, FormatCounts
//!                                            |
//!                                            +--> os_release::parse_line --> OsReleaseFields
//!                                            |
//!                                            +--> container::parse_line --> container images
//!                                                                              |
//!                               detect_distro(OsReleaseFields, FormatCounts) <-+
//!                                            |
//!                                        Inventory
//! ```

pub mod classifier;
pub mod config;
pub mod distro;
pub mod error;
pub mod parser;
pub mod section;
pub mod types;

// --- Public API Re-exports ---

// Parser
pub use parser::InventoryParser;

// Configuration
pub use config::{InventoryParserConfig, InventoryParserConfigBuilder};

// Error
pub use error::InventoryError;

// Types
pub use types::{ContainerImage, FormatCounts, Inventory, PackageFormat};

// Classifiers and state machine
pub use classifier::{OsReleaseFields, OsReleaseKey, PackageClassifier};
pub use distro::detect_distro;
pub use section::{LineAction, Marker, Section, SectionTracker};
