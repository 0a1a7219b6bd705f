//! 배포판 판별기
//!
//! os-release `ID`가 있으면 그대로 매핑하고, os-release가 아예 없을 때만
//! 패키지 문법 카운터의 다수결로 추정합니다.
//!
//! 카운터 기반 추정은 RPM 계열을 모두 `AzureLinux`로 판정하므로
//! `Mariner`는 `ID=mariner`로만 판별됩니다.

use vhdscan_core::types::DistroKind;

use crate::classifier::OsReleaseFields;
use crate::types::FormatCounts;

/// 수집된 os-release 키와 문법 카운터로 배포판을 판별합니다.
///
/// 1. `ID`가 있으면 리터럴 매핑 (알 수 없는 값은 `Unknown`, 카운터로 넘어가지 않음)
/// 2. os-release 키가 하나라도 있지만 `ID`가 없으면 `Unknown`
/// 3. os-release가 비어 있으면 `rpm > apt` -> `AzureLinux`, `apt > rpm` -> `UbuntuDebian`,
///    같으면 `Unknown`
pub fn detect_distro(fields: &OsReleaseFields, counts: FormatCounts) -> DistroKind {
    if let Some(id) = fields.id() {
        return DistroKind::from_os_release_id(id);
    }

    if !fields.is_empty() {
        return DistroKind::Unknown;
    }

    match counts.rpm.cmp(&counts.apt) {
        std::cmp::Ordering::Greater => DistroKind::AzureLinux,
        std::cmp::Ordering::Less => DistroKind::UbuntuDebian,
        std::cmp::Ordering::Equal => DistroKind::Unknown,
    }
}
