//! 도메인 타입 -- 인벤토리 파서 전용 데이터 구조
//!
//! 한 번의 파싱 결과인 [`Inventory`]와 그 구성 요소를 정의합니다.
//! 패키지와 os-release 타입은 취약점 평가기와 공유하므로 core에 있습니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use vhdscan_core::types::{DistroKind, OsRelease, Package};

/// 사전 pull된 컨테이너 이미지
///
/// `registry/repository[:tag]` 참조를 구조 분해 없이 그대로 저장합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerImage {
    /// 이미지 참조 전체
    pub name: String,
}

impl ContainerImage {
    /// 새 컨테이너 이미지를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for ContainerImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 패키지 라인 문법
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
    /// `apt list --installed` 출력 (`name/source,now ver arch [status]`)
    Apt,
    /// `rpm -qa` 출력 (`name-version-release.dist.arch`)
    Rpm,
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Rpm => write!(f, "rpm"),
        }
    }
}

/// 문법별 패키지 매칭 횟수
///
/// os-release 정보가 없을 때 배포판 다수결 판별에 사용됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCounts {
    /// APT 문법으로 분류된 라인 수
    pub apt: usize,
    /// RPM 문법으로 분류된 라인 수
    pub rpm: usize,
}

impl FormatCounts {
    /// 해당 문법의 카운터를 1 증가시킵니다.
    pub fn record(&mut self, format: PackageFormat) {
        match format {
            PackageFormat::Apt => self.apt += 1,
            PackageFormat::Rpm => self.rpm += 1,
        }
    }
}

/// 파싱 결과
///
/// 패키지, 컨테이너 이미지, os-release를 소유하며 반환 후에는 변경되지 않습니다.
/// 세 가지가 모두 비어 있으면 파서는 이 값 대신 `NoContent` 에러를 반환합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// 설치된 패키지 (입력 순서)
    pub packages: Vec<Package>,
    /// 사전 pull된 컨테이너 이미지 (입력 순서)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub container_images: Vec<ContainerImage>,
    /// os-release 식별 정보
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_release: Option<OsRelease>,
    /// 판별된 배포판 (os-release가 없을 때는 패키지 문법 다수결)
    #[serde(default)]
    pub distro: DistroKind,
    /// 문법별 패키지 매칭 횟수
    #[serde(default)]
    pub format_counts: FormatCounts,
}

impl Inventory {
    /// 인식 가능한 내용이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.container_images.is_empty() && self.os_release.is_none()
    }

    /// 패키지 수를 반환합니다.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// 이름으로 첫 번째 패키지를 검색합니다.
    pub fn find_package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inventory({} packages, {} container images, distro={})",
            self.packages.len(),
            self.container_images.len(),
            self.distro,
        )
    }
}
