//! 인벤토리 파서 설정
//!
//! [`InventoryParserConfig`]는 core의 [`InventoryConfig`](vhdscan_core::config::InventoryConfig)에서
//! 파생되며 스트림 읽기 상한을 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use vhdscan_inventory::InventoryParserConfigBuilder;
//!
//! let config = InventoryParserConfigBuilder::new()
//!     .max_line_bytes(64 * 1024)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_line_bytes, 64 * 1024);
//! ```

use serde::{Deserialize, Serialize};

use vhdscan_core::config::{DEFAULT_MAX_LINE_BYTES, MAX_LINE_BYTES_LIMIT};

use crate::error::InventoryError;

/// 인벤토리 파서 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryParserConfig {
    /// 단일 라인 최대 길이 (바이트, 줄바꿈 제외)
    pub max_line_bytes: usize,
}

impl Default for InventoryParserConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

impl InventoryParserConfig {
    /// core의 `InventoryConfig`에서 파서 설정을 생성합니다.
    pub fn from_core(core: &vhdscan_core::config::InventoryConfig) -> Self {
        Self {
            max_line_bytes: core.max_line_bytes,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// - `max_line_bytes`: 1-67108864 (64 MiB)
    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES_LIMIT {
            return Err(InventoryError::Config {
                field: "max_line_bytes".to_owned(),
                reason: format!("must be 1-{MAX_LINE_BYTES_LIMIT}"),
            });
        }
        Ok(())
    }
}

/// [`InventoryParserConfig`] 빌더
#[derive(Default)]
pub struct InventoryParserConfigBuilder {
    config: InventoryParserConfig,
}

impl InventoryParserConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 단일 라인 최대 길이를 설정합니다.
    pub fn max_line_bytes(mut self, max: usize) -> Self {
        self.config.max_line_bytes = max;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `InventoryError::Config` 반환
    pub fn build(self) -> Result<InventoryParserConfig, InventoryError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
