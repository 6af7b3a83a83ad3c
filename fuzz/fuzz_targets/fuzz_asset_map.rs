#![no_main]

use fmg_vault::config::AssetMap;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(map) = AssetMap::parse(text) {
            let _ = map.lookup(1, "Stonehaven");
        }
    }
});
