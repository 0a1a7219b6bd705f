//! 배포판별 버전 비교 -- Debian / RPM 정렬 규칙
//!
//! [`VersionScheme`] 하나의 인터페이스 뒤에 두 가지 정렬 규칙이 있고,
//! [`scheme_for`]가 [`DistroKind`]로 규칙을 고릅니다.
//!
//! [`is_fixed`]는 설치 버전과 권고의 수정 버전으로 "이미 수정됨" 여부를 판정하는
//! 유일한 진입점입니다. 판정할 수 없는 경우는 모두 "미수정"으로 보고합니다.

pub mod debian;
pub mod rpm;

use std::cmp::Ordering;

use tracing::debug;

use vhdscan_core::types::DistroKind;

use crate::error::VulnScanError;

pub use debian::DebianVersion;
pub use rpm::RpmVersion;

/// 버전 정렬 규칙
pub trait VersionScheme: Send + Sync {
    /// 규칙 이름 (로그용)
    fn name(&self) -> &'static str;

    /// 두 버전 문자열을 비교합니다.
    ///
    /// # Errors
    ///
    /// 어느 한쪽이라도 이 규칙으로 파싱할 수 없으면 `VersionParse`를 반환합니다.
    fn compare(&self, a: &str, b: &str) -> Result<Ordering, VulnScanError>;
}

/// dpkg 버전 규칙 (Ubuntu / Debian)
#[derive(Debug, Clone, Copy, Default)]
pub struct DebianScheme;

impl VersionScheme for DebianScheme {
    fn name(&self) -> &'static str {
        "debian"
    }

    fn compare(&self, a: &str, b: &str) -> Result<Ordering, VulnScanError> {
        let a = DebianVersion::parse(a)?;
        let b = DebianVersion::parse(b)?;
        Ok(a.cmp(&b))
    }
}

/// RPM 버전 규칙 (Azure Linux / CBL-Mariner)
#[derive(Debug, Clone, Copy, Default)]
pub struct RpmScheme;

impl VersionScheme for RpmScheme {
    fn name(&self) -> &'static str {
        "rpm"
    }

    fn compare(&self, a: &str, b: &str) -> Result<Ordering, VulnScanError> {
        Ok(RpmVersion::parse(a).cmp(&RpmVersion::parse(b)))
    }
}

/// 배포판에 맞는 정렬 규칙을 반환합니다. `Unknown`이면 `None`입니다.
pub fn scheme_for(distro: DistroKind) -> Option<&'static dyn VersionScheme> {
    match distro {
        DistroKind::UbuntuDebian => Some(&DebianScheme),
        DistroKind::AzureLinux | DistroKind::Mariner => Some(&RpmScheme),
        DistroKind::Unknown => None,
    }
}

/// 설치 버전이 권고의 수정 버전 이상인지 판정합니다.
///
/// - 수정 버전이 비어 있으면 미수정 (수정판 없음)
/// - `Unknown` 배포판이면 미수정
/// - 어느 한쪽 버전을 파싱할 수 없으면 미수정
/// - 그 외에는 `installed >= fixed`
pub fn is_fixed(installed: &str, fixed: &str, distro: DistroKind) -> bool {
    if fixed.is_empty() {
        return false;
    }

    let Some(scheme) = scheme_for(distro) else {
        return false;
    };

    match scheme.compare(installed, fixed) {
        Ok(ordering) => ordering != Ordering::Less,
        Err(e) => {
            debug!(
                scheme = scheme.name(),
                installed,
                fixed,
                error = %e,
                "unparsable version, treating advisory as active"
            );
            false
        }
    }
}
