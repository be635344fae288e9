#![no_main]
use libfuzzer_sys::fuzz_target;
use vxhunter::{Analyzer, VxVersion};

fuzz_target!(|data: &[u8]| {
    for version in [VxVersion::V5, VxVersion::V6] {
        let _ = Analyzer::for_version(version).analyze(data);
    }
});
