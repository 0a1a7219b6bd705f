//! 취약점 평가 에러 타입
//!
//! [`VulnScanError`]는 취약점 소스 조회와 버전 비교에서 발생하는 에러를 나타냅니다.
//! `From<VulnScanError> for VhdscanError` 구현을 통해 상위 에러 타입으로 전파됩니다.

use vhdscan_core::error::{AdvisoryError, VhdscanError};
use vhdscan_core::types::DistroKind;

/// 취약점 평가 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum VulnScanError {
    /// os-release 정보 없이 평가 요청
    #[error("OS release information required for vulnerability checking")]
    MissingOsRelease,

    /// 버전 비교 규칙이 없는 배포판
    #[error("unsupported distribution: {0}")]
    UnsupportedDistro(DistroKind),

    /// 취약점 DB 파일 로딩 실패
    #[error("failed to load vuln db from {path}: {reason}")]
    VulnDbLoad {
        /// DB 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 취약점 DB JSON 파싱 실패
    #[error("vuln db parse error: {0}")]
    VulnDbParse(String),

    /// 버전 문자열 파싱 실패
    #[error("invalid version '{version}': {reason}")]
    VersionParse {
        /// 입력 버전 문자열
        version: String,
        /// 실패 사유
        reason: String,
    },
}

impl From<VulnScanError> for VhdscanError {
    fn from(err: VulnScanError) -> Self {
        let advisory = match err {
            VulnScanError::MissingOsRelease => AdvisoryError::MissingOsRelease,
            VulnScanError::UnsupportedDistro(distro) => {
                AdvisoryError::UnsupportedDistro(distro.to_string())
            }
            err @ (VulnScanError::VulnDbLoad { .. } | VulnScanError::VulnDbParse(_)) => {
                AdvisoryError::VulnDb(err.to_string())
            }
            err @ VulnScanError::VersionParse { .. } => AdvisoryError::VersionParse(err.to_string()),
        };
        VhdscanError::Advisory(advisory)
    }
}
