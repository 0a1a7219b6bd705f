//! 패키지 라인 분류기 -- APT / RPM 두 문법
//!
//! [`PackageClassifier`]는 `=== Installed Packages` 섹션 안의 라인 하나를
//! [`Package`]로 변환합니다. 두 문법을 순서대로 시도하며 먼저 매칭된 쪽이 이깁니다.
//!
//! # APT 형식 예시
//!
//! ```text
//! adduser/noble,now 3.137ubuntu1 all [installed,automatic]
//! bind9-dnsutils/noble-updates,noble-security,now 1:9.18.30-0ubuntu0.24.04.2 amd64 [installed]
//! ```
//!
//! # RPM 형식 예시
//!
//! ```text
//! python3-cryptography-42.0.5-3.azl3.x86_64
//! cloud-init-azure-kvp-24.3.1-1.cm2.noarch
//! ```

use regex::Regex;

use vhdscan_core::types::Package;

use crate::error::InventoryError;
use crate::types::PackageFormat;

/// APT: `name/<source-spec>,now <version> <arch> [<status>]`
const APT_PATTERN: &str = r"^([^/]+)/.*,now\s+(\S+)\s+\S+\s+\[.*\]";

/// RPM: `<namepart>-<release>.<dist-tag>.<arch>`
const RPM_PATTERN: &str = r"^(.+)-([^-]+\.(azl3|cm2)\.(x86_64|noarch))$";

/// RPM namepart 분리: 숫자로 시작하는 마지막 하이픈 뒤 세그먼트
const RPM_NAME_VERSION_PATTERN: &str = r"^(.+)-([0-9].*)$";

/// 패키지 라인 분류기
///
/// 정규식은 생성 시 한 번만 컴파일됩니다. 상태가 없으므로 여러 파서가
/// 공유하거나 스레드 간에 옮겨도 안전합니다.
#[derive(Debug, Clone)]
pub struct PackageClassifier {
    apt: Regex,
    rpm: Regex,
    rpm_name_version: Regex,
}

impl PackageClassifier {
    /// 정규식을 컴파일하여 분류기를 생성합니다.
    pub fn new() -> Result<Self, InventoryError> {
        Ok(Self {
            apt: Regex::new(APT_PATTERN)?,
            rpm: Regex::new(RPM_PATTERN)?,
            rpm_name_version: Regex::new(RPM_NAME_VERSION_PATTERN)?,
        })
    }

    /// 트림된 라인 하나를 분류합니다.
    ///
    /// 어느 문법에도 맞지 않으면 `None`을 반환합니다 (에러 아님).
    pub fn classify(&self, line: &str) -> Option<(Package, PackageFormat)> {
        if line.is_empty() {
            return None;
        }

        if let Some(pkg) = self.classify_apt(line) {
            return Some((pkg, PackageFormat::Apt));
        }

        self.classify_rpm(line).map(|pkg| (pkg, PackageFormat::Rpm))
    }

    /// APT 문법으로 분류합니다.
    pub fn classify_apt(&self, line: &str) -> Option<Package> {
        let caps = self.apt.captures(line)?;
        Some(Package::new(&caps[1], &caps[2]))
    }

    /// RPM 문법으로 분류합니다.
    ///
    /// 아키텍처 접미사를 뗀 release(`3.azl3`)를 upstream 버전 뒤에 붙입니다.
    /// namepart에서 upstream 버전을 분리하지 못하면 namepart 전체가 이름이 되고
    /// release가 버전이 됩니다.
    pub fn classify_rpm(&self, line: &str) -> Option<Package> {
        let caps = self.rpm.captures(line)?;
        let name_part = &caps[1];
        let release = strip_arch(&caps[2]);

        match self.rpm_name_version.captures(name_part) {
            Some(nv) => Some(Package::new(&nv[1], format!("{}-{}", &nv[2], release))),
            None => Some(Package::new(name_part, release)),
        }
    }
}

/// `3.azl3.x86_64` -> `3.azl3`
fn strip_arch(version_part: &str) -> &str {
    match version_part.rsplit_once('.') {
        Some((release, "x86_64" | "noarch")) => release,
        _ => version_part,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PackageClassifier {
        PackageClassifier::new().unwrap()
    }

    fn classify(line: &str) -> Option<(String, String, PackageFormat)> {
        classifier()
            .classify(line)
            .map(|(p, f)| (p.name, p.version, f))
    }

    #[test]
    fn apt_simple() {
        assert_eq!(
            classify("adduser/noble,now 3.137ubuntu1 all [installed,automatic]"),
            Some((
                "adduser".to_owned(),
                "3.137ubuntu1".to_owned(),
                PackageFormat::Apt
            ))
        );
    }

    #[test]
    fn apt_complex_version() {
        let (name, version, _) = classify(
            "apparmor/noble-updates,now 4.0.1really4.0.1-0ubuntu0.24.04.4 amd64 [installed,automatic]",
        )
        .unwrap();
        assert_eq!(name, "apparmor");
        assert_eq!(version, "4.0.1really4.0.1-0ubuntu0.24.04.4");
    }

    #[test]
    fn apt_multiple_sources_and_epoch() {
        let (name, version, _) = classify(
            "bind9-dnsutils/noble-updates,noble-security,now 1:9.18.30-0ubuntu0.24.04.2 amd64 [installed]",
        )
        .unwrap();
        assert_eq!(name, "bind9-dnsutils");
        assert_eq!(version, "1:9.18.30-0ubuntu0.24.04.2");
    }

    #[test]
    fn apt_without_status_is_rejected() {
        assert!(classify("adduser/noble,now 3.137ubuntu1 all").is_none());
    }

    #[test]
    fn rpm_simple() {
        assert_eq!(
            classify("filesystem-1.1-21.azl3.x86_64"),
            Some((
                "filesystem".to_owned(),
                "1.1-21.azl3".to_owned(),
                PackageFormat::Rpm
            ))
        );
    }

    #[test]
    fn rpm_complex_name() {
        let (name, version, format) = classify("python3-cryptography-42.0.5-3.azl3.x86_64").unwrap();
        assert_eq!(name, "python3-cryptography");
        assert_eq!(version, "42.0.5-3.azl3");
        assert_eq!(format, PackageFormat::Rpm);
    }

    #[test]
    fn rpm_noarch() {
        let (name, version, _) = classify("cloud-init-azure-kvp-24.3.1-1.azl3.noarch").unwrap();
        assert_eq!(name, "cloud-init-azure-kvp");
        assert_eq!(version, "24.3.1-1.azl3");
    }

    #[test]
    fn rpm_multiple_version_segments() {
        let (name, version, _) = classify("kernel-devel-5.15.167.4-1.azl3.x86_64").unwrap();
        assert_eq!(name, "kernel-devel");
        assert_eq!(version, "5.15.167.4-1.azl3");
    }

    #[test]
    fn rpm_glibc() {
        let (name, version, _) = classify("glibc-2.38-10.azl3.x86_64").unwrap();
        assert_eq!(name, "glibc");
        assert_eq!(version, "2.38-10.azl3");
    }

    #[test]
    fn rpm_mariner_tags() {
        let (name, version, _) = classify("filesystem-1.1-20.cm2.x86_64").unwrap();
        assert_eq!((name.as_str(), version.as_str()), ("filesystem", "1.1-20.cm2"));

        let (name, version, _) = classify("python3-cryptography-42.0.5-3.cm2.x86_64").unwrap();
        assert_eq!(
            (name.as_str(), version.as_str()),
            ("python3-cryptography", "42.0.5-3.cm2")
        );

        let (name, version, _) = classify("cloud-init-azure-kvp-24.3.1-1.cm2.noarch").unwrap();
        assert_eq!(
            (name.as_str(), version.as_str()),
            ("cloud-init-azure-kvp", "24.3.1-1.cm2")
        );
    }

    #[test]
    fn rpm_name_version_split_fallback() {
        // namepart에 숫자로 시작하는 세그먼트가 없음
        let (name, version, format) = classify("ca-certificates-base-3.azl3.noarch").unwrap();
        assert_eq!(name, "ca-certificates-base");
        assert_eq!(version, "3.azl3");
        assert_eq!(format, PackageFormat::Rpm);
    }

    #[test]
    fn rpm_unknown_dist_tag_is_rejected() {
        assert!(classify("bash-5.2.15-1.fc39.x86_64").is_none());
        assert!(classify("bash-5.2.15-1.azl3.aarch64").is_none());
    }

    #[test]
    fn empty_and_invalid_lines() {
        assert!(classify("").is_none());
        assert!(classify("invalid package line").is_none());
    }

    #[test]
    fn strip_arch_only_removes_known_arch() {
        assert_eq!(strip_arch("3.azl3.x86_64"), "3.azl3");
        assert_eq!(strip_arch("20.cm2.noarch"), "20.cm2");
        assert_eq!(strip_arch("20.cm2"), "20.cm2");
        assert_eq!(strip_arch("1.cm2.aarch64"), "1.cm2.aarch64");
        assert_eq!(strip_arch("plain"), "plain");
    }
}
