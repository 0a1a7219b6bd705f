//! 취약점 데이터베이스 -- 로컬 JSON DB 로딩 및 조회
//!
//! [`VulnDb`]는 로컬 파일시스템의 JSON 파일에서 배포판별 권고를 로드합니다.
//!
//! # DB 디렉토리 구조
//!
//! ```text
//! /var/lib/vhdscan/vuln-db/
//!   ubuntu.json       # Ubuntu / Debian 권고
//!   azurelinux.json   # Azure Linux 3.x 권고
//!   mariner.json      # CBL-Mariner 2.x 권고
//! ```
//!
//! # JSON 형식
//!
//! ```json
//! [
//!   {
//!     "os_version": "24.04",
//!     "package": "curl",
//!     "vulnerability_id": "CVE-2024-2398",
//!     "fixed_version": "8.5.0-2ubuntu10.1"
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use vhdscan_core::types::DistroKind;

use crate::error::VulnScanError;
use crate::source::{Advisory, VulnSource};

/// 취약점 DB 파일 최대 크기 (50 MB)
const MAX_VULN_DB_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// 전체 취약점 DB 엔트리 최대 개수 (1,000,000개)
const MAX_VULN_DB_ENTRIES: usize = 1_000_000;

/// 배포판별 DB 파일
const DISTRO_FILES: [(&str, DistroKind); 3] = [
    ("ubuntu.json", DistroKind::UbuntuDebian),
    ("azurelinux.json", DistroKind::AzureLinux),
    ("mariner.json", DistroKind::Mariner),
];

/// 취약점 DB 엔트리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnDbEntry {
    /// os-release `VERSION_ID` (예: 24.04, 3.0)
    pub os_version: String,
    /// 영향받는 패키지명
    pub package: String,
    /// 취약점 ID
    pub vulnerability_id: String,
    /// 수정된 버전 (없으면 빈 문자열)
    #[serde(default)]
    pub fixed_version: String,
}

impl VulnDbEntry {
    fn to_advisory(&self) -> Advisory {
        Advisory::new(self.vulnerability_id.clone(), self.fixed_version.clone())
    }
}

type IndexKey = (DistroKind, String, String);

/// 취약점 데이터베이스
///
/// `(배포판, OS 버전, 패키지명)`으로 인덱싱된 HashMap으로 O(1) 조회합니다.
/// 같은 키의 엔트리는 로드된 순서를 유지합니다.
#[derive(Debug, Default)]
pub struct VulnDb {
    entries: Vec<(DistroKind, VulnDbEntry)>,
    index: HashMap<IndexKey, Vec<usize>>,
}

impl VulnDb {
    /// 빈 데이터베이스를 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    fn build_index(entries: &[(DistroKind, VulnDbEntry)]) -> HashMap<IndexKey, Vec<usize>> {
        let mut index: HashMap<IndexKey, Vec<usize>> = HashMap::new();
        for (idx, (distro, entry)) in entries.iter().enumerate() {
            let key = (*distro, entry.os_version.clone(), entry.package.clone());
            index.entry(key).or_default().push(idx);
        }
        index
    }

    /// 엔트리 목록으로 데이터베이스를 생성합니다.
    pub fn from_entries(entries: Vec<(DistroKind, VulnDbEntry)>) -> Self {
        let index = Self::build_index(&entries);
        Self { entries, index }
    }

    /// 한 배포판의 JSON 문자열에서 데이터베이스를 파싱합니다.
    pub fn from_json(distro: DistroKind, json: &str) -> Result<Self, VulnScanError> {
        let entries: Vec<VulnDbEntry> = serde_json::from_str(json).map_err(|e| {
            VulnScanError::VulnDbParse(format!("failed to parse vuln db JSON: {e}"))
        })?;
        Ok(Self::from_entries(
            entries.into_iter().map(|e| (distro, e)).collect(),
        ))
    }

    /// 디렉토리에서 모든 배포판의 취약점 DB를 로드합니다.
    ///
    /// 파일이 존재하지 않으면 건너뜁니다.
    ///
    /// # 보안 제한
    ///
    /// - 파일당 최대 50MB (`MAX_VULN_DB_FILE_SIZE`)
    /// - 전체 엔트리 최대 1,000,000개 (`MAX_VULN_DB_ENTRIES`), 초과분은 경고 후 버림
    ///
    /// # Note
    ///
    /// 이 함수는 동기 I/O를 수행합니다. async 컨텍스트에서 호출할 때는
    /// `tokio::task::spawn_blocking`으로 감싸세요.
    pub fn load_from_dir(dir_path: &Path) -> Result<Self, VulnScanError> {
        let mut all_entries: Vec<(DistroKind, VulnDbEntry)> = Vec::new();

        for (filename, distro) in DISTRO_FILES {
            let file_path = dir_path.join(filename);

            let metadata = match std::fs::metadata(&file_path) {
                Ok(m) => m,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %file_path.display(), "vuln db file not found, skipping");
                    continue;
                }
                Err(e) => {
                    return Err(VulnScanError::VulnDbLoad {
                        path: file_path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            };

            let file_size = metadata.len();
            if file_size > MAX_VULN_DB_FILE_SIZE {
                return Err(VulnScanError::VulnDbLoad {
                    path: file_path.display().to_string(),
                    reason: format!(
                        "file size {file_size} bytes exceeds maximum {MAX_VULN_DB_FILE_SIZE} bytes"
                    ),
                });
            }

            let content =
                std::fs::read_to_string(&file_path).map_err(|e| VulnScanError::VulnDbLoad {
                    path: file_path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let entries: Vec<VulnDbEntry> = serde_json::from_str(&content).map_err(|e| {
                VulnScanError::VulnDbParse(format!("failed to parse {}: {e}", file_path.display()))
            })?;

            if all_entries.len() + entries.len() > MAX_VULN_DB_ENTRIES {
                tracing::warn!(
                    current = all_entries.len(),
                    new = entries.len(),
                    max = MAX_VULN_DB_ENTRIES,
                    "vulnerability database entry limit reached, truncating"
                );
                let remaining = MAX_VULN_DB_ENTRIES.saturating_sub(all_entries.len());
                all_entries.extend(entries.into_iter().take(remaining).map(|e| (distro, e)));
                break;
            }

            tracing::info!(
                path = %file_path.display(),
                distro = distro.as_str(),
                entries = entries.len(),
                "loaded vuln db file"
            );

            all_entries.extend(entries.into_iter().map(|e| (distro, e)));
        }

        Ok(Self::from_entries(all_entries))
    }

    /// 데이터베이스 내 전체 엔트리 수를 반환합니다.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// 데이터베이스가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 키에 해당하는 엔트리 참조를 반환합니다.
    pub fn entries_for(
        &self,
        distro: DistroKind,
        os_version: &str,
        package: &str,
    ) -> Vec<&VulnDbEntry> {
        let key = (distro, os_version.to_owned(), package.to_owned());
        self.index
            .get(&key)
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|&idx| self.entries.get(idx).map(|(_, e)| e))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl VulnSource for VulnDb {
    fn name(&self) -> &str {
        "local-json"
    }

    fn lookup(
        &self,
        distro: DistroKind,
        os_version_id: &str,
        package: &str,
    ) -> Result<Vec<Advisory>, VulnScanError> {
        if distro == DistroKind::Unknown {
            return Err(VulnScanError::UnsupportedDistro(distro));
        }
        Ok(self
            .entries_for(distro, os_version_id, package)
            .into_iter()
            .map(VulnDbEntry::to_advisory)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(os_version: &str, package: &str, id: &str, fixed: &str) -> VulnDbEntry {
        VulnDbEntry {
            os_version: os_version.to_owned(),
            package: package.to_owned(),
            vulnerability_id: id.to_owned(),
            fixed_version: fixed.to_owned(),
        }
    }

    fn sample_db() -> VulnDb {
        VulnDb::from_entries(vec![
            (
                DistroKind::UbuntuDebian,
                entry("24.04", "curl", "CVE-2024-2398", "8.5.0-2ubuntu10.1"),
            ),
            (
                DistroKind::UbuntuDebian,
                entry("24.04", "curl", "CVE-2024-6197", ""),
            ),
            (
                DistroKind::UbuntuDebian,
                entry("22.04", "curl", "CVE-2023-0001", "7.81.0-1ubuntu1.16"),
            ),
            (
                DistroKind::AzureLinux,
                entry("3.0", "glibc", "CVE-2024-2961", "2.38-7.azl3"),
            ),
        ])
    }

    #[test]
    fn empty_db() {
        let db = VulnDb::empty();
        assert!(db.is_empty());
        assert!(db.lookup(DistroKind::AzureLinux, "3.0", "glibc").unwrap().is_empty());
    }

    #[test]
    fn lookup_preserves_order() {
        let db = sample_db();
        let advisories = db.lookup(DistroKind::UbuntuDebian, "24.04", "curl").unwrap();
        assert_eq!(advisories.len(), 2);
        assert_eq!(advisories[0].vulnerability_id, "CVE-2024-2398");
        assert_eq!(advisories[1].vulnerability_id, "CVE-2024-6197");
        assert!(!advisories[1].has_fix());
    }

    #[test]
    fn lookup_is_scoped_by_os_version() {
        let db = sample_db();
        let advisories = db.lookup(DistroKind::UbuntuDebian, "22.04", "curl").unwrap();
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].vulnerability_id, "CVE-2023-0001");
    }

    #[test]
    fn lookup_is_scoped_by_distro() {
        let db = sample_db();
        assert!(db.lookup(DistroKind::Mariner, "3.0", "glibc").unwrap().is_empty());
        assert_eq!(db.lookup(DistroKind::AzureLinux, "3.0", "glibc").unwrap().len(), 1);
    }

    #[test]
    fn lookup_unknown_distro_is_unsupported() {
        let err = sample_db()
            .lookup(DistroKind::Unknown, "1.0", "curl")
            .unwrap_err();
        assert!(matches!(err, VulnScanError::UnsupportedDistro(DistroKind::Unknown)));
    }

    #[test]
    fn from_json_valid() {
        let json = r#"[
            {"os_version": "2.0", "package": "openssl", "vulnerability_id": "CVE-2024-0727", "fixed_version": "1.1.1k-29.cm2"},
            {"os_version": "2.0", "package": "openssl", "vulnerability_id": "CVE-2024-9999"}
        ]"#;
        let db = VulnDb::from_json(DistroKind::Mariner, json).unwrap();
        assert_eq!(db.entry_count(), 2);
        let advisories = db.lookup(DistroKind::Mariner, "2.0", "openssl").unwrap();
        assert_eq!(advisories[1].fixed_version, "");
    }

    #[test]
    fn from_json_invalid() {
        let err = VulnDb::from_json(DistroKind::UbuntuDebian, "not json").unwrap_err();
        assert!(matches!(err, VulnScanError::VulnDbParse(_)));
    }

    #[test]
    fn from_json_missing_required_fields() {
        let json = r#"[{"package": "curl"}]"#;
        assert!(VulnDb::from_json(DistroKind::UbuntuDebian, json).is_err());
    }

    #[test]
    fn load_from_dir_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("azurelinux.json"),
            r#"[{"os_version": "3.0", "package": "glibc", "vulnerability_id": "CVE-2024-2961", "fixed_version": "2.38-7.azl3"}]"#,
        )
        .unwrap();

        let db = VulnDb::load_from_dir(dir.path()).unwrap();
        assert_eq!(db.entry_count(), 1);
        assert_eq!(db.lookup(DistroKind::AzureLinux, "3.0", "glibc").unwrap().len(), 1);
    }

    #[test]
    fn load_from_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = VulnDb::load_from_dir(dir.path()).unwrap();
        assert!(db.is_empty());
    }

    #[test]
    fn load_from_dir_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ubuntu.json"), "[{").unwrap();
        let err = VulnDb::load_from_dir(dir.path()).unwrap_err();
        match err {
            VulnScanError::VulnDbParse(msg) => assert!(msg.contains("ubuntu.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
