//! Region fit example: load the sample feeds, fit both growth models for
//! one country and print the tables and charts.
//!
//! Run from the project root:
//!   cargo run --example region_fit

use case_curve_analyzer::analysis::{RegionAnalyzer, RegionQuery};
use case_curve_analyzer::config::ChartStyle;
use case_curve_analyzer::io::{load_dataset, DEFAULT_FILE_PREFIX};
use case_curve_analyzer::visualization::{
    print_evolution_table, print_fit_summary, print_report_charts,
};

fn main() {
    let dataset =
        load_dataset("data/samples", DEFAULT_FILE_PREFIX).expect("Failed to load sample data");
    let analyzer = RegionAnalyzer::new(&dataset);

    let report = analyzer
        .analyze(&RegionQuery::new("Italy", 6e5))
        .expect("Failed to analyze Italy");

    let exp = &report.exponential;
    println!(
        "{}: {:.1}% daily growth from day {}, R² = {:.3}",
        report.label(),
        exp.alpha * 100.0,
        exp.start_index,
        exp.r_squared
    );
    if let Some(days) = exp.doubling_period() {
        println!("Cases double every {days:.1} days");
    }

    let style = ChartStyle {
        width: 60,
        height: 12,
        ..ChartStyle::default()
    };
    print_fit_summary(&report);
    print_evolution_table(&report, style.table_days);
    print_report_charts(&report, &style);

    // Fitting only the early phase changes the growth estimate
    let early = analyzer
        .analyze(&RegionQuery::new("China", 8.2e4).stop_exp(20))
        .expect("Failed to analyze China");
    println!(
        "\n{} (first 20 days): alpha = {:.2}, logistic reaches {:.0} of {:.0}",
        early.label(),
        early.exponential.alpha,
        early.logistic.final_value(),
        early.logistic.ceiling
    );
}
