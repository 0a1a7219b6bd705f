#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`VulnScanError`)
//! - [`version`]: Distribution-aware version ordering (`VersionScheme`, `DebianVersion`, `RpmVersion`, `is_fixed`)
//! - [`source`]: Advisory lookup interface (`VulnSource`, `Advisory`)
//! - [`db`]: Local JSON advisory database (`VulnDb`, `VulnDbEntry`)
//! - [`matcher`]: Active-advisory filtering and reporting (`VulnMatcher`, `ScanReport`)
//!
//! # Architecture
//!
//! ```text
//! Package + OsRelease --> VulnMatcher --> VulnSource::lookup(distro, version_id, name)
//!                              |                        |
//!                              |                  Vec<Advisory>
//!                              |                        |
//!                              +----- is_fixed(installed, fixed, distro) via VersionScheme
//!                              |
//!                   active advisories --> ScanReport (findings, errors, summary)
//! ```

pub mod db;
pub mod error;
pub mod matcher;
pub mod source;
pub mod version;

// --- Public API Re-exports ---

// Matcher
pub use matcher::{PackageFinding, PackageScanError, ScanReport, ScanSummary, VulnMatcher};

// Error
pub use error::VulnScanError;

// Source
pub use db::{VulnDb, VulnDbEntry};
pub use source::{Advisory, VulnSource};

// Version ordering
pub use version::{
    DebianScheme, DebianVersion, RpmScheme, RpmVersion, VersionScheme, is_fixed, scheme_for,
};
