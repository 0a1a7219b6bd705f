//! 메트릭 상수
//!
//! 모든 메트릭의 이름과 레이블 키를 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `vhdscan_`
//! - 모듈명: `inventory_`, `vuln_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(vhdscan_core::metrics::INVENTORY_LINES_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, no_content, error)
pub const LABEL_RESULT: &str = "result";

/// 패키지 형식 레이블 키 (apt, rpm)
pub const LABEL_FORMAT: &str = "format";

/// 배포판 레이블 키 (ubuntu, azurelinux, mariner, unknown)
pub const LABEL_DISTRO: &str = "distro";

// ─── Inventory 메트릭 ──────────────────────────────────────────────

/// Inventory: 파싱 호출 수 (counter, label: result)
pub const INVENTORY_PARSES_TOTAL: &str = "vhdscan_inventory_parses_total";

/// Inventory: 읽은 라인 수 (counter)
pub const INVENTORY_LINES_TOTAL: &str = "vhdscan_inventory_lines_total";

/// Inventory: 추출된 패키지 수 (counter, label: format)
pub const INVENTORY_PACKAGES_TOTAL: &str = "vhdscan_inventory_packages_total";

/// Inventory: 추출된 컨테이너 이미지 수 (counter)
pub const INVENTORY_CONTAINER_IMAGES_TOTAL: &str = "vhdscan_inventory_container_images_total";

// ─── Vuln 메트릭 ───────────────────────────────────────────────────

/// Vuln: 취약점 소스 조회 수 (counter, label: distro)
pub const VULN_LOOKUPS_TOTAL: &str = "vhdscan_vuln_lookups_total";

/// Vuln: 미수정(활성) 취약점 수 (counter, label: distro)
pub const VULN_ACTIVE_ADVISORIES_TOTAL: &str = "vhdscan_vuln_active_advisories_total";
