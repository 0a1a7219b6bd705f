//! 인벤토리 파서 -- 단일 패스 스캔
//!
//! [`InventoryParser`]는 입력 스트림을 한 줄씩 한 번만 읽으며 각 라인을
//! [`SectionTracker`]와 분류기에 통과시켜 [`Inventory`]를 만듭니다.
//!
//! 파서 자체는 컴파일된 정규식과 설정만 가지며, 스캔 중 바뀌는 상태
//! (섹션, 누적 결과, 문법 카운터)는 호출마다 새로 만드는 `ScanContext`에
//! 있습니다. 따라서 하나의 파서를 여러 스레드에서 동시에 사용할 수 있습니다.
//!
//! # 사용 예시
//!
//! ```
//! use vhdscan_inventory::InventoryParser;
//!
//! let log = "=== Installed Packages Begin\n\
//!            adduser/noble,now 3.137ubuntu1 all [installed,automatic]\n\
//!            === Installed Packages End\n";
//!
//! let parser = InventoryParser::new().unwrap();
//! let inventory = parser.parse_str(log).unwrap();
//! assert_eq!(inventory.packages[0].name, "adduser");
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, info};

use vhdscan_core::metrics as m;
use vhdscan_core::types::Package;

use crate::classifier::{OsReleaseFields, PackageClassifier, container, os_release};
use crate::config::InventoryParserConfig;
use crate::distro::detect_distro;
use crate::error::InventoryError;
use crate::section::{LineAction, Section, SectionTracker};
use crate::types::{ContainerImage, FormatCounts, Inventory, PackageFormat};

/// 스트림 이름이 주어지지 않았을 때 에러 메시지에 쓰는 식별자
const DEFAULT_SOURCE_NAME: &str = "<input>";

/// 빌드 로그 인벤토리 파서
#[derive(Debug, Clone)]
pub struct InventoryParser {
    config: InventoryParserConfig,
    packages: PackageClassifier,
}

impl InventoryParser {
    /// 기본 설정으로 파서를 생성합니다.
    pub fn new() -> Result<Self, InventoryError> {
        Self::with_config(InventoryParserConfig::default())
    }

    /// 주어진 설정으로 파서를 생성합니다.
    ///
    /// # Errors
    ///
    /// 설정이 유효하지 않거나 정규식 컴파일에 실패하면 에러를 반환합니다.
    pub fn with_config(config: InventoryParserConfig) -> Result<Self, InventoryError> {
        config.validate()?;
        Ok(Self {
            config,
            packages: PackageClassifier::new()?,
        })
    }

    /// 현재 설정을 반환합니다.
    pub fn config(&self) -> &InventoryParserConfig {
        &self.config
    }

    /// 스트림 전체를 스캔하여 인벤토리를 생성합니다.
    ///
    /// # Errors
    ///
    /// - 인식 가능한 섹션이 하나도 없으면 `NoContent`
    /// - 읽기 실패 시 `Read`
    /// - 라인이 `max_line_bytes`를 넘으면 `LineTooLong`
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Inventory, InventoryError> {
        self.parse_named(reader, DEFAULT_SOURCE_NAME)
    }

    /// 에러 메시지에 쓸 소스 이름과 함께 스트림을 스캔합니다.
    pub fn parse_named<R: BufRead>(
        &self,
        mut reader: R,
        source_name: &str,
    ) -> Result<Inventory, InventoryError> {
        let result = self.scan(&mut reader, source_name);

        let label = match &result {
            Ok(_) => "success",
            Err(InventoryError::NoContent) => "no_content",
            Err(_) => "error",
        };
        metrics::counter!(m::INVENTORY_PARSES_TOTAL, m::LABEL_RESULT => label).increment(1);

        result
    }

    /// 문자열 전체를 스캔합니다.
    pub fn parse_str(&self, content: &str) -> Result<Inventory, InventoryError> {
        self.parse(content.as_bytes())
    }

    /// 파일을 열어 스캔합니다.
    ///
    /// 파일 핸들은 성공, 내용 없음, 읽기 실패 모든 경로에서 반환 전에 닫힙니다.
    ///
    /// # Errors
    ///
    /// - 빈 경로면 `EmptySourceName`
    /// - 열기 실패 시 경로를 소스 이름으로 하는 `Read`
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Inventory, InventoryError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(InventoryError::EmptySourceName);
        }

        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|source| InventoryError::Read {
            source_name: source_name.clone(),
            source,
        })?;

        self.parse_named(BufReader::new(file), &source_name)
    }

    fn scan<R: BufRead>(
        &self,
        reader: &mut R,
        source_name: &str,
    ) -> Result<Inventory, InventoryError> {
        let max = self.config.max_line_bytes;
        let mut ctx = ScanContext::new(&self.packages);
        let mut buf = Vec::with_capacity(256);

        loop {
            buf.clear();
            let line_no = ctx.lines + 1;
            let limit = (max as u64).saturating_add(2);
            let read = reader
                .by_ref()
                .take(limit)
                .read_until(b'\n', &mut buf)
                .map_err(|source| InventoryError::Read {
                    source_name: source_name.to_owned(),
                    source,
                })?;
            if read == 0 {
                break;
            }

            let content = strip_line_ending(&buf);
            if content.len() > max {
                return Err(InventoryError::LineTooLong {
                    source_name: source_name.to_owned(),
                    line: line_no,
                    max,
                });
            }

            let line = String::from_utf8_lossy(content);
            ctx.feed(&line);
        }

        ctx.finish(source_name)
    }
}

/// `\n`과 그 앞의 `\r` 하나를 제거합니다.
fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// 한 번의 스캔 동안만 존재하는 가변 상태
struct ScanContext<'a> {
    classifier: &'a PackageClassifier,
    tracker: SectionTracker,
    packages: Vec<Package>,
    container_images: Vec<ContainerImage>,
    os_release: OsReleaseFields,
    counts: FormatCounts,
    lines: usize,
}

impl<'a> ScanContext<'a> {
    fn new(classifier: &'a PackageClassifier) -> Self {
        Self {
            classifier,
            tracker: SectionTracker::new(),
            packages: Vec::new(),
            container_images: Vec::new(),
            os_release: OsReleaseFields::default(),
            counts: FormatCounts::default(),
            lines: 0,
        }
    }

    fn feed(&mut self, raw: &str) {
        self.lines += 1;
        let trimmed = raw.trim();

        match self.tracker.step(raw, trimmed) {
            LineAction::Marker(marker) => {
                debug!(line = self.lines, ?marker, section = %self.tracker.current(), "section marker");
            }
            LineAction::SectionEnded(section) => {
                debug!(line = self.lines, %section, "section ended by unprefixed line");
            }
            LineAction::Skip | LineAction::Classify(Section::None) => {}
            LineAction::Classify(Section::Packages) => {
                match self.classifier.classify(trimmed) {
                    Some((package, format)) => {
                        self.counts.record(format);
                        self.packages.push(package);
                    }
                    None => debug!(line = self.lines, "unrecognized package line, skipping"),
                }
            }
            LineAction::Classify(Section::OsRelease) => {
                if let Some((key, value)) = os_release::parse_line(trimmed) {
                    self.os_release.set(key, value);
                }
            }
            LineAction::Classify(Section::ContainerImages) => {
                if let Some(image) = container::parse_line(raw) {
                    self.container_images.push(image);
                }
            }
        }
    }

    fn finish(self, source_name: &str) -> Result<Inventory, InventoryError> {
        let distro = detect_distro(&self.os_release, self.counts);
        let inventory = Inventory {
            packages: self.packages,
            container_images: self.container_images,
            os_release: self.os_release.into_os_release(distro),
            distro,
            format_counts: self.counts,
        };

        metrics::counter!(m::INVENTORY_LINES_TOTAL).increment(self.lines as u64);

        if inventory.is_empty() {
            debug!(source = source_name, lines = self.lines, "no recognizable section");
            return Err(InventoryError::NoContent);
        }

        record_counts(&inventory);

        info!(
            source = source_name,
            lines = self.lines,
            packages = inventory.packages.len(),
            container_images = inventory.container_images.len(),
            apt = inventory.format_counts.apt,
            rpm = inventory.format_counts.rpm,
            distro = %inventory.distro,
            "inventory parsed"
        );

        Ok(inventory)
    }
}

fn record_counts(inventory: &Inventory) {
    for (format, count) in [
        (PackageFormat::Apt, inventory.format_counts.apt),
        (PackageFormat::Rpm, inventory.format_counts.rpm),
    ] {
        if count > 0 {
            metrics::counter!(
                m::INVENTORY_PACKAGES_TOTAL,
                m::LABEL_FORMAT => format.to_string()
            )
            .increment(count as u64);
        }
    }
    metrics::counter!(m::INVENTORY_CONTAINER_IMAGES_TOTAL)
        .increment(inventory.container_images.len() as u64);
}
