//! Debian 패키지 버전 -- `[epoch:]upstream_version[-debian_revision]`
//!
//! 비교 규칙은 dpkg의 `verrevcmp`와 같습니다.
//!
//! - epoch는 숫자로 비교하며 없으면 0입니다.
//! - upstream과 revision은 "비숫자 구간 / 숫자 구간"을 번갈아 비교합니다.
//! - 비숫자 구간에서 `~`는 문자열 끝보다 작고, 문자는 그 외 기호보다 작습니다.
//! - 숫자 구간은 앞의 0을 무시한 정수로 비교합니다.
//!
//! ```
//! use vhdscan_vuln::version::DebianVersion;
//!
//! let a: DebianVersion = "1.0~rc1".parse().unwrap();
//! let b: DebianVersion = "1.0".parse().unwrap();
//! assert!(a < b);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::VulnScanError;

/// 파싱된 Debian 버전
///
/// 동등성도 정렬 규칙을 따릅니다 (`1.001 == 1.1`).
#[derive(Debug, Clone)]
pub struct DebianVersion {
    epoch: u32,
    upstream: String,
    revision: String,
}

impl DebianVersion {
    /// 버전 문자열을 파싱합니다.
    ///
    /// # Errors
    ///
    /// - epoch가 숫자가 아님
    /// - upstream이 비었거나 숫자로 시작하지 않음
    /// - 허용되지 않는 문자 포함
    pub fn parse(input: &str) -> Result<Self, VulnScanError> {
        let invalid = |reason: &str| VulnScanError::VersionParse {
            version: input.to_owned(),
            reason: reason.to_owned(),
        };

        let s = input.trim();
        if s.is_empty() {
            return Err(invalid("version string is empty"));
        }
        if s.contains(char::is_whitespace) {
            return Err(invalid("version string has embedded spaces"));
        }

        let (epoch, rest) = match s.split_once(':') {
            Some((epoch, rest)) => {
                if epoch.is_empty() || !epoch.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("epoch must be a non-negative number"));
                }
                let epoch = epoch
                    .parse::<u32>()
                    .map_err(|_| invalid("epoch is out of range"))?;
                (epoch, rest)
            }
            None => (0, s),
        };

        let (upstream, revision) = match rest.rsplit_once('-') {
            Some((upstream, revision)) => (upstream, revision),
            None => (rest, ""),
        };

        if upstream.is_empty() {
            return Err(invalid("upstream version is empty"));
        }
        if !upstream.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid("upstream version must start with a digit"));
        }
        if !upstream
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '~' | '-' | ':'))
        {
            return Err(invalid("upstream version contains an invalid character"));
        }
        if !revision
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '~'))
        {
            return Err(invalid("debian revision contains an invalid character"));
        }

        Ok(Self {
            epoch,
            upstream: upstream.to_owned(),
            revision: revision.to_owned(),
        })
    }

    /// epoch (없으면 0)
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// upstream 버전
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// Debian revision (없으면 빈 문자열)
    pub fn revision(&self) -> &str {
        &self.revision
    }
}

impl FromStr for DebianVersion {
    type Err = VulnScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DebianVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        f.write_str(&self.upstream)?;
        if !self.revision.is_empty() {
            write!(f, "-{}", self.revision)?;
        }
        Ok(())
    }
}

impl Ord for DebianVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| verrevcmp(&self.upstream, &other.upstream))
            .then_with(|| verrevcmp(&self.revision, &other.revision))
    }
}

impl PartialEq for DebianVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DebianVersion {}

impl PartialOrd for DebianVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 비숫자 구간의 문자 가중치 (`None`은 문자열 끝 또는 숫자)
fn order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(b'~') => -1,
        Some(c) => i32::from(c) + 256,
    }
}

fn is_digit(c: Option<u8>) -> bool {
    c.is_some_and(|c| c.is_ascii_digit())
}

/// dpkg `verrevcmp`
fn verrevcmp(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        // 비숫자 구간
        while (i < a.len() && !a[i].is_ascii_digit()) || (j < b.len() && !b[j].is_ascii_digit()) {
            let ac = order(a.get(i).copied());
            let bc = order(b.get(j).copied());
            if ac != bc {
                return ac.cmp(&bc);
            }
            i += 1;
            j += 1;
        }

        // 숫자 구간
        while a.get(i) == Some(&b'0') {
            i += 1;
        }
        while b.get(j) == Some(&b'0') {
            j += 1;
        }

        let mut first_diff = Ordering::Equal;
        while is_digit(a.get(i).copied()) && is_digit(b.get(j).copied()) {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }
        if is_digit(a.get(i).copied()) {
            return Ordering::Greater;
        }
        if is_digit(b.get(j).copied()) {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}
