//! 컨테이너 이미지 라인 분류기
//!
//! `containerd images pre-pulled:` 아래의 항목은 두 칸 들여쓰기 후 `- `로 시작합니다.
//!
//! ```text
//! containerd images pre-pulled:
//!   - mcr.microsoft.com/oss/kubernetes/pause:3.6
//!   - mcr.microsoft.com/azure-cli:2.61.0
//! ```

use crate::types::ContainerImage;

/// 항목 라인 접두어 (트림 전 원본 라인 기준)
pub const ITEM_PREFIX: &str = "  - ";

/// 원본 라인이 컨테이너 이미지 항목 형태인지 확인합니다.
pub fn is_item_line(raw_line: &str) -> bool {
    raw_line.starts_with(ITEM_PREFIX)
}

/// 원본 라인에서 이미지 참조를 추출합니다.
///
/// 접두어 뒤의 나머지를 트림한 결과가 비어 있으면 `None`입니다.
pub fn parse_line(raw_line: &str) -> Option<ContainerImage> {
    let rest = raw_line.strip_prefix(ITEM_PREFIX)?.trim();
    (!rest.is_empty()).then(|| ContainerImage::new(rest))
}
