#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use vhdscan_core::types::DistroKind;
use vhdscan_vuln::{is_fixed, DebianVersion, RpmVersion};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    installed: String,
    fixed: String,
    distro: FuzzDistro,
}

#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzDistro {
    Ubuntu,
    Azure,
    Mariner,
    Unknown,
}

impl From<FuzzDistro> for DistroKind {
    fn from(d: FuzzDistro) -> Self {
        match d {
            FuzzDistro::Ubuntu => DistroKind::UbuntuDebian,
            FuzzDistro::Azure => DistroKind::AzureLinux,
            FuzzDistro::Mariner => DistroKind::Mariner,
            FuzzDistro::Unknown => DistroKind::Unknown,
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    // 두 정렬 규칙 모두 반대칭이어야 함
    if let (Ok(a), Ok(b)) = (
        DebianVersion::parse(&input.installed),
        DebianVersion::parse(&input.fixed),
    ) {
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    let a = RpmVersion::parse(&input.installed);
    let b = RpmVersion::parse(&input.fixed);
    assert_eq!(a.cmp(&b), b.cmp(&a).reverse());

    let distro = DistroKind::from(input.distro);
    let fixed = is_fixed(&input.installed, &input.fixed, distro);
    if input.fixed.is_empty() || distro == DistroKind::Unknown {
        assert!(!fixed);
    }
});
