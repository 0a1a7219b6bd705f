//! 취약점 매칭 -- 권고 조회 후 활성 취약점만 남기기
//!
//! [`VulnMatcher`]는 패키지마다 [`VulnSource`]에서 권고를 조회하고
//! [`is_fixed`]로 이미 수정된 권고를 걸러냅니다.
//!
//! # 사용 흐름
//!
//! 1. `VulnDb::load_from_dir()` -- 로컬 JSON DB 로드
//! 2. `VulnMatcher::new(Arc::new(db))` -- 매처 생성
//! 3. `VulnMatcher::scan(packages, os_release)` -- 인벤토리 스캔
//! 4. 결과: `ScanReport` -- 패키지별 활성 취약점과 요약

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use vhdscan_core::metrics as m;
use vhdscan_core::types::{DistroKind, OsRelease, Package};

use crate::error::VulnScanError;
use crate::source::{Advisory, VulnSource};
use crate::version::is_fixed;

/// 활성 취약점이 있는 패키지 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFinding {
    /// 대상 패키지
    pub package: Package,
    /// 수정되지 않은 권고 (조회 순서 유지)
    pub advisories: Vec<Advisory>,
}

impl PackageFinding {
    /// 수정판이 있는 권고가 하나라도 있는지 확인합니다.
    pub fn has_fixable(&self) -> bool {
        self.advisories.iter().any(Advisory::has_fix)
    }

    /// 수정판이 없는 권고가 하나라도 있는지 확인합니다.
    pub fn has_unfixable(&self) -> bool {
        self.advisories.iter().any(|a| !a.has_fix())
    }
}

/// 패키지 조회 실패 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageScanError {
    /// 대상 패키지
    pub package: Package,
    /// 에러 메시지
    pub message: String,
}

/// 스캔 요약 카운터
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// 스캔한 전체 패키지 수
    pub total_packages: usize,
    /// 활성 취약점이 있는 패키지 수
    pub packages_with_vulns: usize,
    /// 수정판 있는 취약점을 가진 패키지 수
    pub packages_with_fixable_vulns: usize,
    /// 수정판 없는 취약점을 가진 패키지 수
    pub packages_with_unfixable_vulns: usize,
    /// 전체 활성 취약점 수
    pub total_vulns: usize,
    /// 수정판 있는 취약점 수
    pub fixable_vulns: usize,
    /// 수정판 없는 취약점 수
    pub unfixable_vulns: usize,
}

impl ScanSummary {
    fn record(&mut self, finding: &PackageFinding) {
        self.packages_with_vulns += 1;
        self.total_vulns += finding.advisories.len();

        let fixable = finding.advisories.iter().filter(|a| a.has_fix()).count();
        self.fixable_vulns += fixable;
        self.unfixable_vulns += finding.advisories.len() - fixable;

        if finding.has_fixable() {
            self.packages_with_fixable_vulns += 1;
        }
        if finding.has_unfixable() {
            self.packages_with_unfixable_vulns += 1;
        }
    }
}

/// 스캔 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// 스캔 고유 ID
    pub scan_id: String,
    /// 평가에 사용한 os-release (없으면 평가하지 않음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_release: Option<OsRelease>,
    /// 취약점 평가를 수행했는지 여부
    pub checked: bool,
    /// 활성 취약점이 있는 패키지 (입력 순서)
    pub findings: Vec<PackageFinding>,
    /// 조회에 실패한 패키지
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<PackageScanError>,
    /// 요약 카운터
    pub summary: ScanSummary,
}

impl ScanReport {
    /// 활성 취약점이 하나라도 있는지 확인합니다.
    pub fn has_vulnerabilities(&self) -> bool {
        self.summary.total_vulns > 0
    }
}

/// 취약점 매처
///
/// 취약점 소스를 공유하므로 clone 비용이 작습니다.
#[derive(Clone)]
pub struct VulnMatcher {
    source: Arc<dyn VulnSource>,
}

impl VulnMatcher {
    /// 새 매처를 생성합니다.
    pub fn new(source: Arc<dyn VulnSource>) -> Self {
        Self { source }
    }

    /// 취약점 소스 참조를 반환합니다.
    pub fn source(&self) -> &dyn VulnSource {
        self.source.as_ref()
    }

    /// 패키지 하나의 활성 권고를 반환합니다.
    ///
    /// # Errors
    ///
    /// - os-release가 없으면 `MissingOsRelease`
    /// - 배포판이 `Unknown`이면 `UnsupportedDistro`
    /// - 소스 조회 에러는 그대로 전파
    pub fn check_package(
        &self,
        package: &Package,
        os_release: Option<&OsRelease>,
    ) -> Result<Vec<Advisory>, VulnScanError> {
        let os_release = os_release.ok_or(VulnScanError::MissingOsRelease)?;
        let distro = os_release.distro;
        if distro == DistroKind::Unknown {
            return Err(VulnScanError::UnsupportedDistro(distro));
        }

        metrics::counter!(m::VULN_LOOKUPS_TOTAL, m::LABEL_DISTRO => distro.as_str()).increment(1);

        let advisories = self
            .source
            .lookup(distro, &os_release.version_id, &package.name)?;

        let active: Vec<Advisory> = advisories
            .into_iter()
            .filter(|a| !is_fixed(&package.version, &a.fixed_version, distro))
            .collect();

        if !active.is_empty() {
            metrics::counter!(m::VULN_ACTIVE_ADVISORIES_TOTAL, m::LABEL_DISTRO => distro.as_str())
                .increment(active.len() as u64);
        }

        Ok(active)
    }

    /// 패키지 목록 전체를 평가하여 보고서를 생성합니다.
    ///
    /// os-release가 없으면 평가 없이 패키지 수만 담은 보고서를 반환합니다.
    /// 패키지별 조회 에러는 보고서에 기록하고 다음 패키지로 진행합니다.
    pub fn scan(&self, packages: &[Package], os_release: Option<&OsRelease>) -> ScanReport {
        let mut report = ScanReport {
            scan_id: uuid::Uuid::new_v4().to_string(),
            os_release: os_release.cloned(),
            checked: os_release.is_some(),
            findings: Vec::new(),
            errors: Vec::new(),
            summary: ScanSummary {
                total_packages: packages.len(),
                ..ScanSummary::default()
            },
        };

        if os_release.is_none() {
            warn!(
                scan_id = %report.scan_id,
                packages = packages.len(),
                "no os release info, skipping vulnerability check"
            );
            return report;
        }

        for package in packages {
            match self.check_package(package, os_release) {
                Ok(advisories) if advisories.is_empty() => {}
                Ok(advisories) => {
                    let finding = PackageFinding {
                        package: package.clone(),
                        advisories,
                    };
                    report.summary.record(&finding);
                    report.findings.push(finding);
                }
                Err(e) => {
                    debug!(package = %package, error = %e, "vulnerability lookup failed");
                    report.errors.push(PackageScanError {
                        package: package.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            scan_id = %report.scan_id,
            source = self.source.name(),
            packages = report.summary.total_packages,
            vulnerable = report.summary.packages_with_vulns,
            vulns = report.summary.total_vulns,
            errors = report.errors.len(),
            "vulnerability scan completed"
        );

        report
    }
}
