#![no_main]

use fmg_vault::vault::{parse_literal, to_literal};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(src) = std::str::from_utf8(data) {
        // Anything the parser accepts must render and parse back unchanged
        if let Ok(value) = parse_literal(src) {
            let rendered = to_literal(&value);
            let reparsed = parse_literal(&rendered).expect("rendered literal must parse");
            assert_eq!(value, reparsed, "literal round-trip changed {src:?}");
        }
    }
});
