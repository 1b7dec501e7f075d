//! Report export example: analyze the regions of a TOML configuration and
//! write each report as CSV, JSON and Excel.
//!
//! Run from the project root:
//!   cargo run --example report_export

use std::path::Path;

use case_curve_analyzer::analysis::RegionAnalyzer;
use case_curve_analyzer::config::AnalysisConfig;
use case_curve_analyzer::io::{
    load_dataset, read_report_json, CsvFormat, ExcelFormat, JsonFormat, ReportWriter,
    DEFAULT_FILE_PREFIX,
};

const CONFIG: &str = r#"
[[regions]]
country = "France"
ceiling = 300000.0

[[regions]]
country = "China"
ceiling = 1000000.0
exclude = true
"#;

fn main() {
    let config = AnalysisConfig::from_toml(CONFIG).expect("Invalid configuration");
    let dataset =
        load_dataset("data/samples", DEFAULT_FILE_PREFIX).expect("Failed to load sample data");
    let analyzer = RegionAnalyzer::new(&dataset);

    let out = Path::new("target/reports");
    std::fs::create_dir_all(out).expect("Failed to create output directory");

    let writers: [(&str, Box<dyn ReportWriter>); 3] = [
        ("csv", Box::new(CsvFormat)),
        ("json", Box::new(JsonFormat { pretty: true })),
        ("xlsx", Box::new(ExcelFormat)),
    ];

    for query in &config.regions {
        let report = match analyzer.analyze(query) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Skipping {}: {e}", query.label());
                continue;
            }
        };

        let stem = query.label().replace(' ', "_").replace('/', "");
        for (ext, writer) in &writers {
            let path = out.join(format!("{stem}.{ext}"));
            writer.write(&report, &path).expect("Failed to write report");
            println!("Wrote {}", path.display());
        }

        let reloaded =
            read_report_json(out.join(format!("{stem}.json"))).expect("Failed to read JSON");
        println!(
            "  {} round-trips with {} days, alpha = {:.3}",
            reloaded.label(),
            reloaded.num_days(),
            reloaded.exponential.alpha
        );
    }
}
