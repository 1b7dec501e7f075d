//! World summary example: print world, China and rest-of-world totals and
//! the per-country latest counts.
//!
//! Run from the project root:
//!   cargo run --example world_summary

use case_curve_analyzer::analysis::RegionAnalyzer;
use case_curve_analyzer::config::ChartStyle;
use case_curve_analyzer::io::{load_dataset, DEFAULT_FILE_PREFIX};
use case_curve_analyzer::visualization::{format_totals_chart, print_case_summary};

fn main() {
    let dataset =
        load_dataset("data/samples", DEFAULT_FILE_PREFIX).expect("Failed to load sample data");
    println!(
        "Loaded {} regions over {} days starting {}",
        dataset.confirmed.num_regions(),
        dataset.num_days(),
        dataset
            .start_date()
            .map(|d| d.to_string())
            .unwrap_or_default()
    );

    print_case_summary(&RegionAnalyzer::new(&dataset).world_summary());

    println!("\nLatest confirmed per region:");
    for record in &dataset.confirmed.records {
        println!("  {:<28} {:>8.0}", record.display_name(), record.latest());
    }

    let style = ChartStyle::default().with_log_scale(true);
    print!(
        "{}",
        format_totals_chart("Confirmed", &dataset.confirmed.totals, &style)
    );
}
