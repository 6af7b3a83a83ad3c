#![no_main]

use fmg_vault::vault::sanitize_name;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let name = String::from_utf8_lossy(data);
    let safe = sanitize_name(&name);

    assert!(safe.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
    assert!(!safe.starts_with(['_', '-']) && !safe.ends_with(['_', '-']));
    assert_eq!(sanitize_name(&safe), safe, "sanitizing must be idempotent");
});
