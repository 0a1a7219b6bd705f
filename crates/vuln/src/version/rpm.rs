//! RPM 패키지 버전 -- `[epoch:]version[-release]`
//!
//! 세그먼트 비교는 rpm의 `rpmvercmp`와 같습니다.
//!
//! - 영숫자가 아닌 문자는 구분자이며 비교에 참여하지 않습니다 (`~`, `^` 제외).
//! - `~`는 무엇보다 먼저, `^`는 문자열 끝보다 나중이지만 다른 세그먼트보다 먼저 정렬됩니다.
//! - 숫자 세그먼트는 문자 세그먼트보다 새 버전입니다.
//! - 숫자 세그먼트는 앞의 0을 무시하고 길이, 그다음 사전순으로 비교합니다.
//!
//! RPM 버전 파싱은 실패하지 않습니다. 숫자가 아닌 epoch는 0으로 취급합니다.

use std::cmp::Ordering;
use std::fmt;

/// 파싱된 RPM 버전
#[derive(Debug, Clone)]
pub struct RpmVersion {
    epoch: u64,
    version: String,
    release: String,
}

impl RpmVersion {
    /// 버전 문자열을 파싱합니다.
    ///
    /// 첫 `:` 앞은 epoch, 마지막 `-` 뒤는 release입니다.
    pub fn parse(input: &str) -> Self {
        let (epoch, rest) = match input.split_once(':') {
            Some((epoch, rest)) => (epoch.parse::<u64>().unwrap_or(0), rest),
            None => (0, input),
        };

        let (version, release) = match rest.rsplit_once('-') {
            Some((version, release)) => (version, release),
            None => (rest, ""),
        };

        Self {
            epoch,
            version: version.to_owned(),
            release: release.to_owned(),
        }
    }

    /// epoch (없으면 0)
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// version 부분
    pub fn version(&self) -> &str {
        &self.version
    }

    /// release 부분 (없으면 빈 문자열)
    pub fn release(&self) -> &str {
        &self.release
    }
}

impl From<&str> for RpmVersion {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for RpmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        f.write_str(&self.version)?;
        if !self.release.is_empty() {
            write!(f, "-{}", self.release)?;
        }
        Ok(())
    }
}

impl Ord for RpmVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| rpmvercmp(&self.release, &other.release))
    }
}

impl PartialOrd for RpmVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RpmVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RpmVersion {}

fn is_separator(c: u8) -> bool {
    !c.is_ascii_alphanumeric() && c != b'~' && c != b'^'
}

/// rpm `rpmvercmp`
fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        while i < a.len() && is_separator(a[i]) {
            i += 1;
        }
        while j < b.len() && is_separator(b[j]) {
            j += 1;
        }

        let (ac, bc) = (a.get(i).copied(), b.get(j).copied());

        // 틸드: 무엇보다 먼저 정렬
        if ac == Some(b'~') || bc == Some(b'~') {
            if ac != Some(b'~') {
                return Ordering::Greater;
            }
            if bc != Some(b'~') {
                return Ordering::Less;
            }
            i += 1;
            j += 1;
            continue;
        }

        // 캐럿: 문자열 끝보다 나중, 다른 세그먼트보다 먼저
        if ac == Some(b'^') || bc == Some(b'^') {
            if ac.is_none() {
                return Ordering::Less;
            }
            if bc.is_none() {
                return Ordering::Greater;
            }
            if ac != Some(b'^') {
                return Ordering::Greater;
            }
            if bc != Some(b'^') {
                return Ordering::Less;
            }
            i += 1;
            j += 1;
            continue;
        }

        if ac.is_none() || bc.is_none() {
            break;
        }

        let (start_a, start_b) = (i, j);
        let numeric = a[i].is_ascii_digit();
        let same_kind = |c: u8| {
            if numeric {
                c.is_ascii_digit()
            } else {
                c.is_ascii_alphabetic()
            }
        };
        while i < a.len() && same_kind(a[i]) {
            i += 1;
        }
        while j < b.len() && same_kind(b[j]) {
            j += 1;
        }

        let mut seg_a = &a[start_a..i];
        let mut seg_b = &b[start_b..j];

        // 종류가 다른 세그먼트: 숫자가 더 새 버전
        if seg_b.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        if numeric {
            seg_a = trim_leading_zeros(seg_a);
            seg_b = trim_leading_zeros(seg_b);
            match seg_a.len().cmp(&seg_b.len()) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        match seg_a.cmp(seg_b) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }

    match (i < a.len(), j < b.len()) {
        (false, false) => Ordering::Equal,
        (true, _) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

fn trim_leading_zeros(seg: &[u8]) -> &[u8] {
    let start = seg.iter().position(|&c| c != b'0').unwrap_or(seg.len());
    &seg[start..]
}
