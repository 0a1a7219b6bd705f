//! 섹션 추적기 -- 마커 라인 기반 상태 기계
//!
//! [`SectionTracker`]는 라인 하나마다 [`SectionTracker::step`]을 호출받아
//! 그 라인을 어느 분류기로 보낼지 [`LineAction`]으로 알려줍니다.
//!
//! # 상태 전이
//!
//! ```text
//! None ──"=== Installed Packages Begin"──> Packages ──"=== Installed Packages End"──> None
//! None ──"=== os-release Begin"──────────> OsRelease ─"=== os-release End"─────────> None
//! None ──"containerd images pre-pulled:"─> ContainerImages ─(접두어 없는 라인)───────> None
//! ```
//!
//! 시작 마커는 어느 상태에서든 받아들여지며 이전 상태를 대체합니다.
//! 종료 마커는 자기 섹션만 닫습니다.

use std::fmt;

use crate::classifier::container;

/// 현재 섹션 (상호 배타)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    /// 어떤 섹션에도 속하지 않음
    #[default]
    None,
    /// `=== Installed Packages Begin` 이후
    Packages,
    /// `=== os-release Begin` 이후
    OsRelease,
    /// `containerd images pre-pulled:` 이후
    ContainerImages,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Packages => write!(f, "packages"),
            Self::OsRelease => write!(f, "os-release"),
            Self::ContainerImages => write!(f, "container-images"),
        }
    }
}

/// 인식하는 마커 라인
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `=== Installed Packages Begin`
    PackagesBegin,
    /// `=== Installed Packages End`
    PackagesEnd,
    /// `=== os-release Begin`
    OsReleaseBegin,
    /// `=== os-release End`
    OsReleaseEnd,
    /// `containerd images pre-pulled:`
    ContainerImagesBegin,
}

impl Marker {
    /// 트림된 라인이 마커와 정확히 일치하면 해당 마커를 반환합니다.
    pub fn recognize(line: &str) -> Option<Self> {
        match line {
            "=== Installed Packages Begin" => Some(Self::PackagesBegin),
            "=== Installed Packages End" => Some(Self::PackagesEnd),
            "=== os-release Begin" => Some(Self::OsReleaseBegin),
            "=== os-release End" => Some(Self::OsReleaseEnd),
            "containerd images pre-pulled:" => Some(Self::ContainerImagesBegin),
            _ => None,
        }
    }
}

/// 라인 하나에 대한 처리 지시
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    /// 마커 라인 -- 상태만 바뀌고 분류하지 않음
    Marker(Marker),
    /// 빈 라인, `Listing...`, 섹션 밖 라인
    Skip,
    /// 해당 섹션의 분류기로 전달
    Classify(Section),
    /// 컨테이너 섹션이 접두어 없는 라인으로 암묵적으로 종료됨
    SectionEnded(Section),
}

/// 섹션 상태 기계
///
/// 한 번의 파싱 동안만 사용되며 파서 호출 간에 공유되지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct SectionTracker {
    current: Section,
}

impl SectionTracker {
    /// `None` 상태의 추적기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 섹션을 반환합니다.
    pub fn current(&self) -> Section {
        self.current
    }

    /// 라인 하나를 관찰하고 처리 방법을 반환합니다.
    ///
    /// `raw`는 줄바꿈만 제거한 원본, `trimmed`는 앞뒤 공백을 제거한 라인입니다.
    /// 컨테이너 항목 접두어는 들여쓰기가 의미를 가지므로 `raw`로 검사합니다.
    pub fn step(&mut self, raw: &str, trimmed: &str) -> LineAction {
        if let Some(marker) = Marker::recognize(trimmed) {
            self.apply(marker);
            return LineAction::Marker(marker);
        }

        if trimmed.is_empty() || trimmed == "Listing..." {
            return LineAction::Skip;
        }

        match self.current {
            Section::None => LineAction::Skip,
            Section::ContainerImages if !container::is_item_line(raw) => {
                self.current = Section::None;
                LineAction::SectionEnded(Section::ContainerImages)
            }
            section => LineAction::Classify(section),
        }
    }

    fn apply(&mut self, marker: Marker) {
        self.current = match (marker, self.current) {
            (Marker::PackagesBegin, _) => Section::Packages,
            (Marker::OsReleaseBegin, _) => Section::OsRelease,
            (Marker::ContainerImagesBegin, _) => Section::ContainerImages,
            (Marker::PackagesEnd, Section::Packages) => Section::None,
            (Marker::OsReleaseEnd, Section::OsRelease) => Section::None,
            (Marker::PackagesEnd | Marker::OsReleaseEnd, current) => current,
        };
    }
}
