#![no_main]

use libfuzzer_sys::fuzz_target;
use vhdscan_inventory::{InventoryParser, InventoryParserConfigBuilder};

fuzz_target!(|data: &[u8]| {
    // 작은 라인 상한으로 LineTooLong 경로도 함께 탐색
    let Ok(config) = InventoryParserConfigBuilder::new().max_line_bytes(4096).build() else {
        return;
    };
    let Ok(parser) = InventoryParser::with_config(config) else {
        return;
    };

    if let Ok(inventory) = parser.parse(data) {
        assert!(!inventory.is_empty(), "parser returned an empty inventory");
        assert_eq!(
            inventory.format_counts.apt + inventory.format_counts.rpm,
            inventory.packages.len(),
            "every package comes from exactly one grammar"
        );
    }
});
