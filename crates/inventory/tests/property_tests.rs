//! Property-based tests for the inventory parser
//!
//! Uses proptest to check line-counting and scoping properties over generated build logs.

use proptest::prelude::*;

use vhdscan_inventory::{InventoryParser, PackageClassifier, PackageFormat};

fn apt_line() -> impl Strategy<Value = (String, String, String)> {
    (
        "[a-z][a-z0-9+.-]{0,20}",
        "[0-9][a-z0-9.+~:-]{0,15}",
        prop_oneof![Just("amd64"), Just("all"), Just("arm64")],
    )
        .prop_map(|(name, version, arch)| {
            let line = format!("{name}/noble-updates,now {version} {arch} [installed,automatic]");
            (name, version, line)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Parser must never panic on arbitrary input
    #[test]
    fn parser_never_panics(input in ".*") {
        let parser = InventoryParser::new().unwrap();
        let _ = parser.parse_str(&input);
    }

    /// Parser must never panic on arbitrary bytes
    #[test]
    fn parser_never_panics_on_bytes(input in prop::collection::vec(any::<u8>(), 0..512)) {
        let parser = InventoryParser::new().unwrap();
        let _ = parser.parse(&input[..]);
    }

    /// Every well-formed APT line in a packages section yields exactly one package
    #[test]
    fn apt_package_count_matches_lines(lines in prop::collection::vec(apt_line(), 1..40)) {
        let mut input = String::from("=== Installed Packages Begin\n");
        for (_, _, line) in &lines {
            input.push_str(line);
            input.push('\n');
        }
        input.push_str("=== Installed Packages End\n");

        let inventory = InventoryParser::new().unwrap().parse_str(&input).unwrap();
        prop_assert_eq!(inventory.packages.len(), lines.len());
        prop_assert_eq!(inventory.format_counts.apt, lines.len());
        for (pkg, (name, version, _)) in inventory.packages.iter().zip(&lines) {
            prop_assert_eq!(&pkg.name, name);
            prop_assert_eq!(&pkg.version, version);
        }
    }

    /// The classifier agrees with the parser on well-formed APT lines
    #[test]
    fn classifier_reports_apt_format((name, version, line) in apt_line()) {
        let classifier = PackageClassifier::new().unwrap();
        let (pkg, format) = classifier.classify(&line).unwrap();
        prop_assert_eq!(format, PackageFormat::Apt);
        prop_assert_eq!(pkg.name, name);
        prop_assert_eq!(pkg.version, version);
    }

    /// Lines outside any section never produce packages
    #[test]
    fn lines_outside_sections_are_ignored(lines in prop::collection::vec(apt_line(), 1..20)) {
        let mut input = String::new();
        for (_, _, line) in &lines {
            input.push_str(line);
            input.push('\n');
        }
        let err = InventoryParser::new().unwrap().parse_str(&input).unwrap_err();
        prop_assert!(err.is_no_content());
    }

    /// Reordering independent sections does not change per-section results
    #[test]
    fn section_order_is_irrelevant(
        images in prop::collection::vec("[a-z]{1,10}(:[0-9]{1,3})?", 1..6),
        lines in prop::collection::vec(apt_line(), 1..10),
        order in Just(vec![0usize, 1, 2]).prop_shuffle(),
    ) {
        let mut sections = [String::new(), String::new(), String::new()];
        sections[0].push_str("=== Installed Packages Begin\n");
        for (_, _, line) in &lines {
            sections[0].push_str(line);
            sections[0].push('\n');
        }
        sections[0].push_str("=== Installed Packages End\n");
        sections[1].push_str("containerd images pre-pulled:\n");
        for image in &images {
            sections[1].push_str(&format!("  - {image}\n"));
        }
        sections[2].push_str("=== os-release Begin\nID=ubuntu\nVERSION_ID=\"24.04\"\n=== os-release End\n");

        let canonical: String = sections.concat();
        let shuffled: String = order.iter().map(|&i| sections[i].as_str()).collect();

        let parser = InventoryParser::new().unwrap();
        let a = parser.parse_str(&canonical).unwrap();
        let b = parser.parse_str(&shuffled).unwrap();
        prop_assert_eq!(a, b);
    }
}
