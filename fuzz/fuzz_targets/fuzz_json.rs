#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = case_curve_analyzer::io::read_report_json_from_bytes(data) {
        let _ = report.label();
        let _ = report.date_of(report.num_days());
    }
});
