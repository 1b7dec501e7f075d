use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use case_curve_analyzer::{
    analysis::{RegionAnalyzer, RegionQuery, RegionReport},
    config::{AnalysisConfig, ChartStyle},
    io::{self, ReportWriter},
    visualization::{
        format_death_rate_chart, format_totals_chart, print_case_summary,
        print_death_rate_summary, print_evolution_table, print_fit_summary, print_report_charts,
    },
};

#[derive(Parser)]
#[command(
    name = "case-analyzer",
    about = "Case Curve Analyzer - growth model fitting for case-count time series",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show world, China and rest-of-world totals and death rates
    Summary {
        /// Directory holding the Confirmed, Deaths and Recovered CSV files
        #[arg(short, long)]
        data_dir: PathBuf,

        /// File name prefix of the CSV files
        #[arg(long, default_value = io::DEFAULT_FILE_PREFIX)]
        prefix: String,

        /// Skip the totals charts
        #[arg(long)]
        no_charts: bool,
    },

    /// Fit growth models for one country (or the world without it)
    Region {
        /// Directory holding the Confirmed, Deaths and Recovered CSV files
        #[arg(short, long)]
        data_dir: PathBuf,

        /// File name prefix of the CSV files
        #[arg(long, default_value = io::DEFAULT_FILE_PREFIX)]
        prefix: String,

        /// Country name, matched exactly
        #[arg(short, long)]
        country: String,

        /// Estimated final number of cases for the logistic model
        #[arg(long)]
        ceiling: f64,

        /// Fit the exponential model on the first N days only (0 fits every day)
        #[arg(long)]
        stop_exp: Option<usize>,

        /// Analyze every region except the given country
        #[arg(long)]
        exclude: bool,

        /// Write the report to a .csv, .json or .xlsx file
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// TOML file with chart settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip the charts
        #[arg(long)]
        no_charts: bool,
    },

    /// Analyze every region listed in a configuration file
    Batch {
        /// Directory holding the Confirmed, Deaths and Recovered CSV files
        #[arg(short, long)]
        data_dir: PathBuf,

        /// File name prefix of the CSV files
        #[arg(long, default_value = io::DEFAULT_FILE_PREFIX)]
        prefix: String,

        /// TOML file with chart settings and regions (built-in presets if omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory to write one JSON report per region into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip the charts
        #[arg(long)]
        no_charts: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn print_report(report: &RegionReport, style: &ChartStyle, charts: bool) {
    let exp = &report.exponential;
    println!(
        "{} - R = {:.2} - a = {:.2e} - b = {:.2e} - alpha = {:.2}",
        report.label().bold(),
        exp.r_squared,
        exp.a,
        exp.b,
        exp.alpha
    );
    if let Some(g) = report.evolution.latest_growth_factor() {
        println!("  Latest growth factor: {g:.2}");
    }
    print_fit_summary(report);
    print_evolution_table(report, style.table_days);
    if charts {
        print_report_charts(report, style);
    }
}

/// File name for a region's JSON report, e.g. `world_wo_China.json`.
fn report_file_name(query: &RegionQuery) -> String {
    let country = query.country.replace(|c: char| !c.is_alphanumeric(), "_");
    if query.exclude {
        format!("world_wo_{country}.json")
    } else {
        format!("{country}.json")
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            data_dir,
            prefix,
            no_charts,
        } => {
            let dataset = io::load_dataset(&data_dir, &prefix)?;
            println!(
                "\n{}",
                format!("Case Summary: {}", data_dir.display()).bold().cyan()
            );
            println!(
                "  Loaded {} regions over {} days",
                dataset.confirmed.num_regions(),
                dataset.num_days()
            );
            println!("  Countries: {}", dataset.confirmed.countries().join(", "));

            let analyzer = RegionAnalyzer::new(&dataset);
            print_case_summary(&analyzer.world_summary());
            let death_rates = analyzer.world_death_rates()?;
            print_death_rate_summary(&death_rates);

            if !no_charts {
                let style = ChartStyle::default();
                for table in [&dataset.confirmed, &dataset.deaths, &dataset.recovered] {
                    print!("{}", format_totals_chart(&table.name, &table.totals, &style));
                }
                let days = dataset.confirmed.day_indices();
                let linear = style.with_log_scale(false);
                for rate in &death_rates {
                    print!(
                        "{}",
                        format_death_rate_chart(
                            &format!("{} - Death rate (%)", rate.label),
                            &days,
                            &rate.bounds,
                            &linear,
                        )
                    );
                }
            }
        }

        Commands::Region {
            data_dir,
            prefix,
            country,
            ceiling,
            stop_exp,
            exclude,
            export,
            pretty,
            config,
            no_charts,
        } => {
            if ceiling <= 0.0 {
                anyhow::bail!("Ceiling must be positive, got {ceiling}");
            }
            let config = load_config(config.as_deref())?;
            let dataset = io::load_dataset(&data_dir, &prefix)?;

            let query = RegionQuery {
                country,
                ceiling,
                stop_exp,
                exclude,
            };
            let report = RegionAnalyzer::new(&dataset).analyze(&query)?;
            print_report(&report, &config.chart, !no_charts);

            if let Some(path) = export {
                io::writer_for(&path, pretty)?.write(&report, &path)?;
                println!(
                    "{} Exported {} -> {}",
                    "Success:".green().bold(),
                    report.label(),
                    path.display()
                );
            }
        }

        Commands::Batch {
            data_dir,
            prefix,
            config,
            output_dir,
            no_charts,
        } => {
            let config = load_config(config.as_deref())?;
            let dataset = io::load_dataset(&data_dir, &prefix)?;
            let analyzer = RegionAnalyzer::new(&dataset);

            if let Some(dir) = &output_dir {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }

            let mut failures = 0;
            for query in &config.regions {
                match analyzer.analyze(query) {
                    Ok(report) => {
                        print_report(&report, &config.chart, !no_charts);
                        if let Some(dir) = &output_dir {
                            let path = dir.join(report_file_name(query));
                            io::write_report_json(&report, &path, true)?;
                        }
                    }
                    Err(e) => {
                        failures += 1;
                        eprintln!("{}: {}: {e}", "Warning".yellow(), query.label());
                    }
                }
            }

            if failures == config.regions.len() && failures > 0 {
                anyhow::bail!("No region could be analyzed");
            }
        }
    }

    Ok(())
}
