#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed feeds must be rejected with an error, never a panic
    if let Ok(table) = case_curve_analyzer::io::read_time_series_from_bytes(data, "fuzz") {
        let ndays = table.num_days();
        for record in &table.records {
            assert_eq!(record.num_days(), ndays);
        }
        let _ = case_curve_analyzer::analysis::select(&table.records, "China", ndays, true);
    }
});
