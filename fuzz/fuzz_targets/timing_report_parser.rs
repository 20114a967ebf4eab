#![no_main]

use libfuzzer_sys::fuzz_target;
use lwcbench::timing_report::TimingReport;

fuzz_target!(|data: &[u8]| {
    // Malformed reports must come back as errors, never as panics
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = TimingReport::parse(input);
    }
});
