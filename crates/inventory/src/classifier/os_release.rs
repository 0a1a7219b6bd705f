//! os-release 라인 분류기
//!
//! `=== os-release Begin` / `=== os-release End` 사이의 `KEY=VALUE` 라인을 읽어
//! 다섯 개의 식별 키만 [`OsReleaseFields`]에 모읍니다.

use vhdscan_core::types::{DistroKind, OsRelease};

/// 보존하는 os-release 키
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsReleaseKey {
    /// `NAME`
    Name,
    /// `VERSION_ID`
    VersionId,
    /// `VERSION`
    Version,
    /// `PRETTY_NAME`
    PrettyName,
    /// `ID`
    Id,
}

impl OsReleaseKey {
    /// 키 문자열을 매핑합니다. 보존 대상이 아니면 `None`입니다.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "NAME" => Some(Self::Name),
            "VERSION_ID" => Some(Self::VersionId),
            "VERSION" => Some(Self::Version),
            "PRETTY_NAME" => Some(Self::PrettyName),
            "ID" => Some(Self::Id),
            _ => None,
        }
    }
}

/// 트림된 라인 하나를 `(키, 값)`으로 분리합니다.
///
/// 첫 번째 `=`에서 나누고 양쪽을 트림한 뒤 값을 감싼 큰따옴표 한 쌍을 제거합니다.
/// `=`가 없거나 키가 비었거나 보존 대상이 아닌 키면 `None`입니다.
pub fn parse_line(line: &str) -> Option<(OsReleaseKey, String)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let key = OsReleaseKey::from_key(key)?;
    Some((key, unquote(value.trim()).to_owned()))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// 수집 중인 os-release 키/값
///
/// 같은 키가 여러 번 나오면 마지막 값이 이깁니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsReleaseFields {
    name: Option<String>,
    version_id: Option<String>,
    version: Option<String>,
    pretty_name: Option<String>,
    id: Option<String>,
}

impl OsReleaseFields {
    /// 값을 기록합니다.
    pub fn set(&mut self, key: OsReleaseKey, value: String) {
        let slot = match key {
            OsReleaseKey::Name => &mut self.name,
            OsReleaseKey::VersionId => &mut self.version_id,
            OsReleaseKey::Version => &mut self.version,
            OsReleaseKey::PrettyName => &mut self.pretty_name,
            OsReleaseKey::Id => &mut self.id,
        };
        *slot = Some(value);
    }

    /// 값을 조회합니다.
    pub fn get(&self, key: OsReleaseKey) -> Option<&str> {
        match key {
            OsReleaseKey::Name => self.name.as_deref(),
            OsReleaseKey::VersionId => self.version_id.as_deref(),
            OsReleaseKey::Version => self.version.as_deref(),
            OsReleaseKey::PrettyName => self.pretty_name.as_deref(),
            OsReleaseKey::Id => self.id.as_deref(),
        }
    }

    /// `ID` 값 (없으면 `None`)
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// 기록된 키가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.version_id.is_none()
            && self.version.is_none()
            && self.pretty_name.is_none()
            && self.id.is_none()
    }

    /// 판별된 배포판과 함께 [`OsRelease`]로 변환합니다.
    ///
    /// 비어 있으면 `None`을 반환합니다. 없는 키는 빈 문자열이 됩니다.
    pub fn into_os_release(self, distro: DistroKind) -> Option<OsRelease> {
        if self.is_empty() {
            return None;
        }
        Some(OsRelease {
            name: self.name.unwrap_or_default(),
            version_id: self.version_id.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
            pretty_name: self.pretty_name.unwrap_or_default(),
            id: self.id.unwrap_or_default(),
            distro,
        })
    }
}
