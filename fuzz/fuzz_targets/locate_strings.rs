#![no_main]
use libfuzzer_sys::fuzz_target;
use vxhunter::strings::{decode_string_table, locate_string_table, LocateParams};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let anchor = data[0] as usize % data.len();
    let params = LocateParams {
        required: 3,
        max_name_len: 255,
        max_gap: 4,
    };
    if let Some(located) = locate_string_table(data, anchor, &params).found() {
        for rec in decode_string_table(data, located.range) {
            assert!(located.range.contains(rec.address));
        }
    }
});
