//! 인벤토리 파서 벤치마크
//!
//! APT / RPM 빌드 로그 크기별 파싱 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use vhdscan_inventory::{InventoryParser, PackageClassifier};

/// Ubuntu 빌드 로그 생성 (count개 패키지)
fn generate_apt_log(count: usize) -> String {
    let mut log = String::from("Starting VHD build\n=== Installed Packages Begin\nListing...\n");
    for i in 0..count {
        log.push_str(&format!(
            "pkg-{i}/noble-updates,noble-security,now 1:{}.{}.{}-0ubuntu0.24.04.{} amd64 [installed,automatic]\n",
            i % 10,
            i % 7,
            i % 13,
            i % 5
        ));
    }
    log.push_str("=== Installed Packages End\ncontainerd images pre-pulled:\n");
    for i in 0..count / 20 {
        log.push_str(&format!("  - mcr.microsoft.com/oss/kubernetes/image-{i}:v1.{i}\n"));
    }
    log.push_str("=== os-release Begin\nID=ubuntu\nVERSION_ID=\"24.04\"\n=== os-release End\n");
    log
}

/// Azure Linux 빌드 로그 생성 (count개 패키지)
fn generate_rpm_log(count: usize) -> String {
    let mut log = String::from("=== Installed Packages Begin\n");
    for i in 0..count {
        let arch = if i % 3 == 0 { "noarch" } else { "x86_64" };
        log.push_str(&format!(
            "python3-pkg-{i}-{}.{}.{}-{}.azl3.{arch}\n",
            i % 10,
            i % 7,
            i % 13,
            i % 5 + 1
        ));
    }
    log.push_str("=== Installed Packages End\n=== os-release Begin\nID=azurelinux\n=== os-release End\n");
    log
}

fn bench_parse(c: &mut Criterion) {
    let parser = InventoryParser::new().unwrap();
    let mut group = c.benchmark_group("inventory_parse");

    for count in [100usize, 1_000, 10_000] {
        let apt = generate_apt_log(count);
        group.throughput(Throughput::Bytes(apt.len() as u64));
        group.bench_with_input(BenchmarkId::new("apt", count), &apt, |b, log| {
            b.iter(|| parser.parse_str(black_box(log)).unwrap())
        });

        let rpm = generate_rpm_log(count);
        group.throughput(Throughput::Bytes(rpm.len() as u64));
        group.bench_with_input(BenchmarkId::new("rpm", count), &rpm, |b, log| {
            b.iter(|| parser.parse_str(black_box(log)).unwrap())
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let classifier = PackageClassifier::new().unwrap();

    c.bench_function("classify_apt_line", |b| {
        b.iter(|| {
            classifier.classify(black_box(
                "bind9-dnsutils/noble-updates,noble-security,now 1:9.18.30-0ubuntu0.24.04.2 amd64 [installed]",
            ))
        })
    });

    c.bench_function("classify_rpm_line", |b| {
        b.iter(|| classifier.classify(black_box("python3-cryptography-42.0.5-3.azl3.x86_64")))
    });

    c.bench_function("classify_unmatched_line", |b| {
        b.iter(|| classifier.classify(black_box("Image pull finished in 142s")))
    });
}

criterion_group!(benches, bench_parse, bench_classify);
criterion_main!(benches);
