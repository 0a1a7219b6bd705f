//! 인벤토리 파서 에러 타입
//!
//! [`InventoryError`]는 인벤토리 파싱 중 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<InventoryError> for VhdscanError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **내용 없음**: `NoContent` -- 인식 가능한 섹션이 하나도 없음 (I/O 실패와 구분)
//! - **스트림 읽기**: `Read`, `LineTooLong`, `EmptySourceName`
//! - **초기화**: `Pattern`, `Config`
//!
//! 인식하지 못한 라인은 에러가 아니며 분류기 단계에서 조용히 건너뜁니다.

use vhdscan_core::error::{ConfigError, ParseError, VhdscanError};

/// 인벤토리 파서 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// 패키지, 컨테이너 이미지, os-release 중 어느 것도 발견되지 않음
    #[error("no package section found")]
    NoContent,

    /// 입력 스트림 읽기 실패
    #[error("error reading content from {source_name}: {source}")]
    Read {
        /// 입력 소스 식별자 (파일 경로, stdin 등)
        source_name: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 단일 라인이 버퍼 상한을 초과
    #[error("line {line} in {source_name} exceeds maximum length of {max} bytes")]
    LineTooLong {
        /// 입력 소스 식별자
        source_name: String,
        /// 1부터 시작하는 라인 번호
        line: usize,
        /// 허용 최대 길이 (바이트)
        max: usize,
    },

    /// 빈 파일 경로로 파싱 요청
    #[error("filename cannot be empty")]
    EmptySourceName,

    /// 정규식 컴파일 에러
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl InventoryError {
    /// "인식 가능한 내용 없음" 에러인지 확인합니다.
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }
}

impl From<InventoryError> for VhdscanError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NoContent => VhdscanError::Parse(ParseError::NoContent),
            InventoryError::Read { source_name, source } => VhdscanError::Parse(
                ParseError::ReadFailed(format!("{source_name}: {source}")),
            ),
            err @ (InventoryError::LineTooLong { .. }
            | InventoryError::EmptySourceName
            | InventoryError::Pattern(_)) => {
                VhdscanError::Parse(ParseError::InvalidInput(err.to_string()))
            }
            InventoryError::Config { field, reason } => {
                VhdscanError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}
