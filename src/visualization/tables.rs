use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::analysis::{AggregateDeathRate, CaseSummary, RegionReport};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Format a ratio or rate, showing `-` when undefined.
fn defined(v: f64, precision: usize) -> String {
    if v.is_finite() {
        format!("{v:.precision$}")
    } else {
        "-".to_string()
    }
}

/// Format the latest confirmed, deaths and recovered counts per aggregate.
pub fn format_case_summary(summaries: &[CaseSummary]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Case Summary".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Region", "Cases", "Deaths", "Recovered"]);
    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.label),
            Cell::new(format!("{:.0}", s.confirmed)),
            Cell::new(format!("{:.0}", s.deaths)),
            Cell::new(format!("{:.0}", s.recovered)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the case summary table.
pub fn print_case_summary(summaries: &[CaseSummary]) {
    print!("{}", format_case_summary(summaries));
}

/// Format the latest lower and upper death-rate bounds per aggregate.
pub fn format_death_rate_summary(rates: &[AggregateDeathRate]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Death Rate".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Region", "Death Rate Inf %", "Death Rate Sup %"]);
    for rate in rates {
        let lower = rate.bounds.lower.last().copied().unwrap_or(f64::NAN);
        let upper = rate.bounds.upper.last().copied().unwrap_or(f64::NAN);
        table.add_row(vec![
            Cell::new(&rate.label),
            Cell::new(defined(lower, 2)),
            Cell::new(defined(upper, 2)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the death-rate summary table.
pub fn print_death_rate_summary(rates: &[AggregateDeathRate]) {
    print!("{}", format_death_rate_summary(rates));
}

/// Format the exponential and logistic model parameters of a report.
pub fn format_fit_summary(report: &RegionReport) -> String {
    let exp = &report.exponential;
    let logistic = &report.logistic;

    let mut output = String::new();
    output.push_str(&format!("\n{}\n", format!("{} - Growth Models", report.label()).bold().green()));
    if let Some(date) = report.start_date {
        output.push_str(&format!(
            "{}\n",
            format!("Start date: {}", date.format("%-d %B %Y")).dimmed()
        ));
    }
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = new_table(vec!["Model", "Parameter", "Value"]);
    table.add_row(vec![
        Cell::new("Exponential"),
        Cell::new("a (log slope)"),
        Cell::new(format!("{:.3e}", exp.a)),
    ]);
    table.add_row(vec![
        Cell::new(""),
        Cell::new("b (log intercept)"),
        Cell::new(format!("{:.3e}", exp.b)),
    ]);
    table.add_row(vec![
        Cell::new(""),
        Cell::new("alpha (daily growth)"),
        Cell::new(format!("{:.2} ({:.1}%)", exp.alpha, exp.alpha * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new(""),
        Cell::new("R²"),
        Cell::new(format!("{:.3}", exp.r_squared)),
    ]);
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Doubling period"),
        Cell::new(
            exp.doubling_period()
                .map(|d| format!("{d:.2} days"))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]);
    if let Some(ci) = &exp.rate_interval {
        table.add_row(vec![
            Cell::new(""),
            Cell::new(format!("a {:.0}% CI", ci.confidence_level * 100.0)),
            Cell::new(format!("[{:.3e}, {:.3e}]", ci.lower, ci.upper)),
        ]);
    }
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Fitted days"),
        Cell::new(format!(
            "{} from day {}",
            exp.num_points(),
            exp.start_index
        )),
    ]);
    table.add_row(vec![
        Cell::new("Logistic"),
        Cell::new("n_tot (ceiling)"),
        Cell::new(format!("{:.0}", logistic.ceiling)),
    ]);
    table.add_row(vec![
        Cell::new(""),
        Cell::new("alpha"),
        Cell::new(format!("{:.2}", logistic.alpha)),
    ]);
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Projected cases"),
        Cell::new(format!(
            "{:.0} ({:.1}% of ceiling)",
            logistic.final_value(),
            logistic.saturation() * 100.0
        )),
    ]);

    output.push_str(&format!("{table}"));
    output
}

/// Print the growth model summary table.
pub fn print_fit_summary(report: &RegionReport) {
    print!("{}", format_fit_summary(report));
}

/// Format the last `last_days` days of cases, daily increase, growth factor
/// and death-rate bounds.
pub fn format_evolution_table(report: &RegionReport, last_days: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", format!("{} - Evolution", report.label()).bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(70)));

    let mut table = new_table(vec![
        "Day",
        "Date",
        "Cases",
        "Daily Increase",
        "Growth Factor",
        "Death Rate Inf %",
        "Death Rate Sup %",
    ]);

    let n = report.num_days();
    for day in n.saturating_sub(last_days)..n {
        let date = report
            .date_of(day)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(format!("{day}")),
            Cell::new(date),
            Cell::new(format!("{:.0}", report.confirmed.values[day])),
            Cell::new(format!("{:.1}", report.evolution.increase[day])),
            Cell::new(defined(report.evolution.growth_factor[day], 2)),
            Cell::new(defined(report.death_rate.lower[day], 2)),
            Cell::new(defined(report.death_rate.upper[day], 2)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the evolution table.
pub fn print_evolution_table(report: &RegionReport, last_days: usize) {
    print!("{}", format_evolution_table(report, last_days));
}
