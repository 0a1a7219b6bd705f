//! `vhdscan scan` command handler

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use vhdscan_core::config::VhdscanConfig;
use vhdscan_inventory::ContainerImage;
use vhdscan_vuln::{ScanReport, VulnDb, VulnMatcher};

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::source::InputSource;

use super::build_parser;

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config: &VhdscanConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = InputSource::parse(&args.source)?;
    let db_path = resolve_db_path(args.db, config)?;
    let parser = build_parser(config)?;

    info!(source = %source, db = %db_path.display(), "starting vulnerability scan");

    let inventory = source.read_inventory(parser).await?;
    let db = load_db(db_path).await?;
    let matcher = VulnMatcher::new(Arc::new(db));

    let report = matcher.scan(&inventory.packages, inventory.os_release.as_ref());
    let output = ScanOutput {
        source: source.to_string(),
        container_images: inventory.container_images,
        report,
    };

    writer.render(&output)?;

    if args.fail_on_vulns && output.report.has_vulnerabilities() {
        return Err(CliError::VulnerabilitiesFound(
            output.report.summary.total_vulns,
        ));
    }

    Ok(())
}

/// `--db` wins; otherwise `[vuln] db_path`, which requires `[vuln] enabled`.
fn resolve_db_path(flag: Option<PathBuf>, config: &VhdscanConfig) -> Result<PathBuf, CliError> {
    match flag {
        Some(path) => Ok(path),
        None if config.vuln.enabled => Ok(PathBuf::from(&config.vuln.db_path)),
        None => Err(CliError::Config(
            "vulnerability checking is disabled ([vuln] enabled = false); pass --db to scan"
                .to_owned(),
        )),
    }
}

async fn load_db(path: PathBuf) -> Result<VulnDb, CliError> {
    let db_path = path.display().to_string();
    let db = tokio::task::spawn_blocking(move || VulnDb::load_from_dir(&path))
        .await
        .map_err(|e| CliError::Command(format!("vuln db load task failed: {e}")))??;

    if db.is_empty() {
        warn!(path = %db_path, "vulnerability database is empty, no advisories will match");
    }
    Ok(db)
}

/// Scan output payload.
#[derive(Serialize)]
pub struct ScanOutput {
    /// Build log source (file path or `<stdin>`)
    pub source: String,
    /// Pre-pulled container images (listed, not scanned)
    pub container_images: Vec<ContainerImage>,
    #[serde(flatten)]
    pub report: ScanReport,
}

impl Render for ScanOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let report = &self.report;
        let summary = &report.summary;

        writeln!(w, "Scan: {}", self.source.bold())?;
        writeln!(w)?;

        writeln!(w, "=== Container Images ===")?;
        for image in &self.container_images {
            writeln!(w, "{image}")?;
        }

        writeln!(w)?;
        writeln!(w, "=== Packages with Vulnerabilities ===")?;

        if !report.checked {
            writeln!(
                w,
                "{}",
                "Unable to check vulnerabilities (no OS release info)".yellow()
            )?;
        } else {
            for finding in &report.findings {
                writeln!(
                    w,
                    "Package: {} {}",
                    finding.package.name.bold(),
                    finding.package.version
                )?;
                for advisory in &finding.advisories {
                    if advisory.has_fix() {
                        writeln!(w, "  - {}", advisory.to_string().yellow())?;
                    } else {
                        writeln!(w, "  - {}", advisory.to_string().red())?;
                    }
                }
                writeln!(w)?;
            }
            for error in &report.errors {
                writeln!(
                    w,
                    "Package: {} {} - Error: {}",
                    error.package.name, error.package.version, error.message
                )?;
            }
        }

        writeln!(w, "=== Vulnerability Scan Summary ===")?;
        writeln!(w, "Total packages scanned: {}", summary.total_packages)?;
        writeln!(w, "Packages with vulnerabilities: {}", summary.packages_with_vulns)?;
        writeln!(
            w,
            "Packages with fixable vulnerabilities: {}",
            summary.packages_with_fixable_vulns
        )?;
        writeln!(
            w,
            "Packages with unfixable vulnerabilities: {}",
            summary.packages_with_unfixable_vulns
        )?;
        let total = format!("{}", summary.total_vulns);
        if summary.total_vulns > 0 {
            writeln!(w, "Total vulnerabilities found: {}", total.red().bold())?;
        } else {
            writeln!(w, "Total vulnerabilities found: {}", total.green().bold())?;
        }
        writeln!(w, "Fixable vulnerabilities: {}", summary.fixable_vulns)?;
        writeln!(w, "Unfixable vulnerabilities: {}", summary.unfixable_vulns)?;

        if let Some(os) = &report.os_release {
            writeln!(w)?;
            writeln!(w, "=== OS Info ===")?;
            writeln!(w, "Distribution: {}", os.distro)?;
            writeln!(w, "OS: {} {} ({})", os.name, os.version, os.version_id)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vhdscan_core::types::{DistroKind, OsRelease, Package};
    use vhdscan_vuln::VulnDbEntry;

    fn ubuntu_release() -> OsRelease {
        OsRelease {
            name: "Ubuntu".to_owned(),
            version_id: "24.04".to_owned(),
            version: "24.04.1 LTS (Noble Numbat)".to_owned(),
            pretty_name: "Ubuntu 24.04.1 LTS".to_owned(),
            id: "ubuntu".to_owned(),
            distro: DistroKind::UbuntuDebian,
        }
    }

    fn entry(package: &str, id: &str, fixed: &str) -> (DistroKind, VulnDbEntry) {
        (
            DistroKind::UbuntuDebian,
            VulnDbEntry {
                os_version: "24.04".to_owned(),
                package: package.to_owned(),
                vulnerability_id: id.to_owned(),
                fixed_version: fixed.to_owned(),
            },
        )
    }

    fn output_for(os_release: Option<OsRelease>) -> ScanOutput {
        let db = VulnDb::from_entries(vec![
            entry("curl", "CVE-2024-7264", "8.5.0-2ubuntu10.8"),
            entry("openssh-server", "CVE-2024-6387", ""),
        ]);
        let matcher = VulnMatcher::new(Arc::new(db));
        let packages = vec![
            Package::new("curl", "8.5.0-2ubuntu10.6"),
            Package::new("openssh-server", "1:9.6p1-3ubuntu13.5"),
            Package::new("bash", "5.2.21-2ubuntu4"),
        ];
        ScanOutput {
            source: "build.log".to_owned(),
            container_images: vec![ContainerImage::new("mcr.microsoft.com/oss/kubernetes/pause:3.6")],
            report: matcher.scan(&packages, os_release.as_ref()),
        }
    }

    fn render(output: &ScanOutput) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        output.render_text(&mut buffer).expect("render should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_render_text_with_findings() {
        let text = render(&output_for(Some(ubuntu_release())));
        assert!(text.contains("=== Container Images ===\nmcr.microsoft.com/oss/kubernetes/pause:3.6"));
        assert!(text.contains("Package: curl 8.5.0-2ubuntu10.6"));
        assert!(text.contains("  - CVE-2024-7264 (needs upgrade to: 8.5.0-2ubuntu10.8)"));
        assert!(text.contains("  - CVE-2024-6387 (no fix available)"));
        assert!(!text.contains("Package: bash"));
        assert!(text.contains("Total packages scanned: 3"));
        assert!(text.contains("Packages with vulnerabilities: 2"));
        assert!(text.contains("Fixable vulnerabilities: 1"));
        assert!(text.contains("Unfixable vulnerabilities: 1"));
        assert!(text.contains("=== OS Info ===\nDistribution: Ubuntu/Debian"));
        assert!(text.contains("OS: Ubuntu 24.04.1 LTS (Noble Numbat) (24.04)"));
    }

    #[test]
    fn test_render_text_without_os_release() {
        let text = render(&output_for(None));
        assert!(text.contains("Unable to check vulnerabilities (no OS release info)"));
        assert!(text.contains("Total packages scanned: 3"));
        assert!(text.contains("Total vulnerabilities found: 0"));
        assert!(!text.contains("=== OS Info ==="));
    }

    #[test]
    fn test_json_output_carries_summary() {
        let json = serde_json::to_value(output_for(Some(ubuntu_release()))).expect("serialize");
        assert_eq!(json["source"], "build.log");
        assert_eq!(json["checked"], true);
        assert_eq!(json["summary"]["total_vulns"], 2);
        assert_eq!(json["findings"].as_array().map(Vec::len), Some(2));
        assert!(json["scan_id"].is_string());
    }

    #[test]
    fn test_resolve_db_path_prefers_flag() {
        let mut config = VhdscanConfig::default();
        config.vuln.enabled = false;
        let path = resolve_db_path(Some(PathBuf::from("/tmp/db")), &config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/db"));
    }

    #[test]
    fn test_resolve_db_path_from_config() {
        let config = VhdscanConfig::default();
        let path = resolve_db_path(None, &config).unwrap();
        assert_eq!(path, PathBuf::from("/var/lib/vhdscan/vuln-db"));
    }

    #[test]
    fn test_resolve_db_path_disabled_is_config_error() {
        let mut config = VhdscanConfig::default();
        config.vuln.enabled = false;
        let err = resolve_db_path(None, &config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_load_db_from_empty_dir_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = load_db(dir.path().to_path_buf()).await.expect("empty db");
        assert!(db.is_empty());
    }

    #[tokio::test]
    async fn test_load_db_reads_distro_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("ubuntu.json"),
            r#"[{"os_version":"24.04","package":"curl","vulnerability_id":"CVE-2024-7264","fixed_version":"8.5.0-2ubuntu10.8"}]"#,
        )
        .expect("write db");
        let db = load_db(dir.path().to_path_buf()).await.expect("db");
        assert!(!db.is_empty());
    }
}
