//! 에러 타입 -- 도메인별 에러 정의

/// vhdscan 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum VhdscanError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 인벤토리 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 취약점 평가 에러
    #[error("advisory error: {0}")]
    Advisory(#[from] AdvisoryError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 인벤토리 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 인식 가능한 섹션이 하나도 없음
    #[error("no recognizable section found")]
    NoContent,

    /// 입력 스트림 읽기 실패
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// 잘못된 입력 (라인 길이 초과 등)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// 취약점 평가 에러
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// 지원하지 않는 배포판
    #[error("unsupported distribution: {0}")]
    UnsupportedDistro(String),

    /// os-release 정보 없음
    #[error("os release information required for vulnerability checking")]
    MissingOsRelease,

    /// 취약점 DB 로딩/파싱 실패
    #[error("vulnerability db error: {0}")]
    VulnDb(String),

    /// 버전 파싱 실패
    #[error("version parse error: {0}")]
    VersionParse(String),
}
