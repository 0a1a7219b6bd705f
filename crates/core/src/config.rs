//! 설정 관리 -- vhdscan.toml 파싱 및 런타임 설정
//!
//! [`VhdscanConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`VHDSCAN_VULN_DB_PATH=/srv/db` 형식)
//! 3. 설정 파일 (`vhdscan.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), vhdscan_core::error::VhdscanError> {
//! use vhdscan_core::config::VhdscanConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = VhdscanConfig::load("vhdscan.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = VhdscanConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, VhdscanError};

/// 라인 버퍼 기본 상한 (1 MiB)
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// 라인 버퍼 설정 상한 (64 MiB)
pub const MAX_LINE_BYTES_LIMIT: usize = 64 * 1024 * 1024;

/// vhdscan 통합 설정
///
/// `vhdscan.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VhdscanConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 인벤토리 파서 설정
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// 취약점 평가 설정
    #[serde(default)]
    pub vuln: VulnConfig,
}

impl VhdscanConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, VhdscanError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에서 시작하여 로드합니다.
    ///
    /// CLI처럼 설정 파일이 선택 사항인 호출자를 위한 진입점입니다.
    /// 파일이 존재하지만 잘못된 경우에는 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, VhdscanError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(VhdscanError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, VhdscanError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VhdscanError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                VhdscanError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, VhdscanError> {
        toml::from_str(toml_str).map_err(|e| {
            VhdscanError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `VHDSCAN_{SECTION}_{FIELD}`
    /// 예: `VHDSCAN_GENERAL_LOG_LEVEL=debug`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "VHDSCAN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "VHDSCAN_GENERAL_LOG_FORMAT");

        // Inventory
        override_usize(
            &mut self.inventory.max_line_bytes,
            "VHDSCAN_INVENTORY_MAX_LINE_BYTES",
        );

        // Vuln
        override_bool(&mut self.vuln.enabled, "VHDSCAN_VULN_ENABLED");
        override_string(&mut self.vuln.db_path, "VHDSCAN_VULN_DB_PATH");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), VhdscanError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.inventory.max_line_bytes == 0 || self.inventory.max_line_bytes > MAX_LINE_BYTES_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "inventory.max_line_bytes".to_owned(),
                reason: format!("must be 1-{MAX_LINE_BYTES_LIMIT}"),
            }
            .into());
        }

        if self.vuln.enabled {
            if self.vuln.db_path.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "vuln.db_path".to_owned(),
                    reason: "db_path must not be empty when enabled".to_owned(),
                }
                .into());
            }

            // Path traversal 체크: Path::components()로 정확하게 ParentDir 컴포넌트 검출
            if Path::new(&self.vuln.db_path)
                .components()
                .any(|c| c == std::path::Component::ParentDir)
            {
                return Err(ConfigError::InvalidValue {
                    field: "vuln.db_path".to_owned(),
                    reason: "db_path contains path traversal pattern '..'".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 인벤토리 파서 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// 한 라인의 최대 길이 (바이트)
    pub max_line_bytes: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// 취약점 평가 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VulnConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 로컬 취약점 DB 디렉토리
    pub db_path: String,
}

impl Default for VulnConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            db_path: "/var/lib/vhdscan/vuln-db".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = VhdscanConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.inventory.max_line_bytes, 1024 * 1024);
        assert!(config.vuln.enabled);
        assert_eq!(config.vuln.db_path, "/var/lib/vhdscan/vuln-db");
    }

    #[test]
    fn default_config_passes_validation() {
        let config = VhdscanConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = VhdscanConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.inventory.max_line_bytes, DEFAULT_MAX_LINE_BYTES);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[vuln]
db_path = "/opt/vhdscan/db"
"#;
        let config = VhdscanConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.vuln.db_path, "/opt/vhdscan/db");
        assert!(config.vuln.enabled);
    }

    #[test]
    fn from_str_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "pretty"

[inventory]
max_line_bytes = 2097152

[vuln]
enabled = false
db_path = "/srv/vuln-db"
"#;
        let config = VhdscanConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.inventory.max_line_bytes, 2 * 1024 * 1024);
        assert!(!config.vuln.enabled);
        assert_eq!(config.vuln.db_path, "/srv/vuln-db");
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = VhdscanConfig::parse("invalid = [[[toml");
        assert!(matches!(
            result,
            Err(VhdscanError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = VhdscanConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = VhdscanConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_line_limit() {
        let mut config = VhdscanConfig::default();
        config.inventory.max_line_bytes = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_line_bytes"));
    }

    #[test]
    fn validate_rejects_oversized_line_limit() {
        let mut config = VhdscanConfig::default();
        config.inventory.max_line_bytes = MAX_LINE_BYTES_LIMIT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_db_path_when_enabled() {
        let mut config = VhdscanConfig::default();
        config.vuln.db_path = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("db_path"));
    }

    #[test]
    fn validate_accepts_empty_db_path_when_disabled() {
        let mut config = VhdscanConfig::default();
        config.vuln.enabled = false;
        config.vuln.db_path = String::new();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_db_path_traversal() {
        let mut config = VhdscanConfig::default();
        config.vuln.db_path = "/var/lib/../../etc".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("traversal"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_VHDSCAN_STR", "overridden") };
        override_string(&mut val, "TEST_VHDSCAN_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_VHDSCAN_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_VHDSCAN_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_VHDSCAN_BOOL_BAD");
        assert!(val); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_VHDSCAN_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_usize_invalid_keeps_original() {
        let mut val = 42usize;
        // SAFETY: serial 테스트로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_VHDSCAN_USIZE_BAD", "lots") };
        override_usize(&mut val, "TEST_VHDSCAN_USIZE_BAD");
        assert_eq!(val, 42);
        unsafe { std::env::remove_var("TEST_VHDSCAN_USIZE_BAD") };
    }

    #[test]
    #[serial]
    fn apply_env_overrides_updates_sections() {
        let mut config = VhdscanConfig::default();
        // SAFETY: serial 테스트로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe {
            std::env::set_var("VHDSCAN_GENERAL_LOG_LEVEL", "debug");
            std::env::set_var("VHDSCAN_INVENTORY_MAX_LINE_BYTES", "4096");
            std::env::set_var("VHDSCAN_VULN_DB_PATH", "/tmp/vhdscan-db");
        }
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var("VHDSCAN_GENERAL_LOG_LEVEL");
            std::env::remove_var("VHDSCAN_INVENTORY_MAX_LINE_BYTES");
            std::env::remove_var("VHDSCAN_VULN_DB_PATH");
        }

        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.inventory.max_line_bytes, 4096);
        assert_eq!(config.vuln.db_path, "/tmp/vhdscan-db");
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_VHDSCAN_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = VhdscanConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = VhdscanConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.inventory.max_line_bytes, parsed.inventory.max_line_bytes);
        assert_eq!(config.vuln.db_path, parsed.vuln.db_path);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = VhdscanConfig::from_file("/nonexistent/path/vhdscan.toml").await;
        assert!(matches!(
            result,
            Err(VhdscanError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[tokio::test]
    #[serial]
    async fn load_or_default_without_file_uses_defaults() {
        let config = VhdscanConfig::load_or_default("/nonexistent/path/vhdscan.toml")
            .await
            .unwrap();
        assert_eq!(config.inventory.max_line_bytes, DEFAULT_MAX_LINE_BYTES);
    }

    #[tokio::test]
    async fn load_or_default_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vhdscan.toml");
        std::fs::write(&path, "[general\nlog_level = 1").unwrap();
        let result = VhdscanConfig::load_or_default(&path).await;
        assert!(matches!(
            result,
            Err(VhdscanError::Config(ConfigError::ParseFailed { .. }))
        ));
    }
}
