//! 도메인 타입 -- 파서와 취약점 평가기가 공유하는 공통 타입
//!
//! 인벤토리 파서가 생성하고 취약점 매처가 소비하는 데이터 구조를 정의합니다.
//! 두 크레이트는 서로에게 의존하지 않고 이 타입들만 주고받습니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 운영체제 배포판 종류
///
/// 버전 비교 방식을 결정하는 닫힌 집합입니다.
/// `UbuntuDebian`은 Debian 버전 규칙을, `AzureLinux`와 `Mariner`는 RPM 버전 규칙을 사용합니다.
/// `Unknown`은 버전 비교에 참여하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistroKind {
    /// 판별 불가
    #[default]
    Unknown,
    /// Ubuntu / Debian (dpkg 버전 규칙)
    UbuntuDebian,
    /// Microsoft Azure Linux 3.x (RPM 버전 규칙)
    AzureLinux,
    /// CBL-Mariner 2.x (RPM 버전 규칙)
    Mariner,
}

impl DistroKind {
    /// os-release `ID` 값을 배포판으로 매핑합니다.
    ///
    /// 대소문자를 구분하며, 알 수 없는 값은 `Unknown`입니다.
    pub fn from_os_release_id(id: &str) -> Self {
        match id {
            "ubuntu" | "debian" => Self::UbuntuDebian,
            "azurelinux" => Self::AzureLinux,
            "mariner" => Self::Mariner,
            _ => Self::Unknown,
        }
    }

    /// RPM 계열 배포판인지 확인합니다.
    pub fn is_rpm_based(&self) -> bool {
        matches!(self, Self::AzureLinux | Self::Mariner)
    }

    /// 메트릭 레이블 등에 쓰이는 짧은 식별자를 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::UbuntuDebian => "ubuntu",
            Self::AzureLinux => "azurelinux",
            Self::Mariner => "mariner",
        }
    }
}

impl fmt::Display for DistroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::UbuntuDebian => write!(f, "Ubuntu/Debian"),
            Self::AzureLinux => write!(f, "Azure Linux"),
            Self::Mariner => write!(f, "CBL-Mariner"),
        }
    }
}

/// 설치된 OS 패키지
///
/// 이름과 버전은 배포판 고유 문법의 불투명한 문자열입니다.
/// 중복 제거를 하지 않으며 입력 순서를 유지합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// 패키지 이름
    pub name: String,
    /// 설치된 버전
    pub version: String,
}

impl Package {
    /// 새 패키지를 생성합니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// os-release 식별 정보
///
/// `NAME`, `VERSION_ID`, `VERSION`, `PRETTY_NAME`, `ID` 다섯 키만 보존합니다.
/// `distro`는 입력 필드가 아니라 탐지 결과입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsRelease {
    /// NAME
    pub name: String,
    /// VERSION_ID
    pub version_id: String,
    /// VERSION
    pub version: String,
    /// PRETTY_NAME
    pub pretty_name: String,
    /// ID
    pub id: String,
    /// 탐지된 배포판
    pub distro: DistroKind,
}

impl fmt::Display for OsRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.pretty_name, self.version, self.distro)
    }
}
