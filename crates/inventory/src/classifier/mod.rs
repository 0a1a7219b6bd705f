//! 라인 분류기 -- 섹션별 라인 문법
//!
//! 각 분류기는 라인 하나만 보고 판단하는 순수 함수입니다. 인식하지 못한 라인은
//! 에러가 아니라 `None`이며, 어떤 섹션에 있는지는 [`crate::section`]이 결정합니다.
//!
//! - [`package`]: APT / RPM 패키지 라인
//! - [`os_release`]: `KEY=VALUE` 라인
//! - [`container`]: `  - image` 라인

pub mod container;
pub mod os_release;
pub mod package;

pub use os_release::{OsReleaseFields, OsReleaseKey};
pub use package::PackageClassifier;
