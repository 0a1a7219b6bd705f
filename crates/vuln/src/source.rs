//! 취약점 소스 -- 권고 조회 인터페이스
//!
//! [`VulnSource`]는 `(배포판, OS 버전, 패키지 이름)`으로 권고 목록을 돌려주는
//! 외부 데이터 소스를 추상화합니다. 로컬 JSON DB([`VulnDb`](crate::db::VulnDb))가
//! 기본 구현입니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use vhdscan_core::types::DistroKind;

use crate::error::VulnScanError;

/// 알려진 취약점 권고
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    /// 취약점 ID (예: CVE-2024-1234)
    pub vulnerability_id: String,
    /// 수정된 버전 (빈 문자열이면 수정판 없음)
    #[serde(default)]
    pub fixed_version: String,
}

impl Advisory {
    /// 새 권고를 생성합니다.
    pub fn new(vulnerability_id: impl Into<String>, fixed_version: impl Into<String>) -> Self {
        Self {
            vulnerability_id: vulnerability_id.into(),
            fixed_version: fixed_version.into(),
        }
    }

    /// 수정판이 있는지 확인합니다.
    pub fn has_fix(&self) -> bool {
        !self.fixed_version.is_empty()
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_fix() {
            write!(
                f,
                "{} (needs upgrade to: {})",
                self.vulnerability_id, self.fixed_version
            )
        } else {
            write!(f, "{} (no fix available)", self.vulnerability_id)
        }
    }
}

/// 권고 조회 소스
///
/// 구현체는 `Send + Sync`여야 하며, 동시에 여러 조회를 받을 수 있어야 합니다.
pub trait VulnSource: Send + Sync {
    /// 소스 이름 (로그용)
    fn name(&self) -> &str;

    /// 패키지에 해당하는 권고를 조회합니다.
    ///
    /// # Errors
    ///
    /// 배포판을 지원하지 않거나 소스 접근에 실패하면 에러를 반환합니다.
    fn lookup(
        &self,
        distro: DistroKind,
        os_version_id: &str,
        package: &str,
    ) -> Result<Vec<Advisory>, VulnScanError>;
}
