use colored::Colorize;

use crate::analysis::{DeathRateBounds, RegionReport};
use crate::config::ChartStyle;
use crate::models::Totals;

/// Width of the y-axis label gutter.
const LABEL_WIDTH: usize = 10;

/// One curve to draw.
#[derive(Debug, Clone, Copy)]
pub struct ChartSeries<'a> {
    pub label: &'a str,
    pub days: &'a [f64],
    pub values: &'a [f64],
    pub marker: char,
}

/// Short axis label, e.g. `1.2M`, `35.0k`, `4.50`.
fn compact(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}k", v / 1e3)
    } else if abs >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

/// Map a value onto the y axis, dropping what the scale cannot show.
fn to_axis(v: f64, log_scale: bool) -> Option<f64> {
    if !v.is_finite() {
        None
    } else if log_scale {
        (v > 0.0).then(|| v.log10())
    } else {
        Some(v)
    }
}

fn from_axis(y: f64, log_scale: bool) -> f64 {
    if log_scale {
        10f64.powf(y)
    } else {
        y
    }
}

/// Position of `v` on a grid of `cells` cells spanning `[min, min + span]`.
fn cell(v: f64, min: f64, span: f64, cells: usize) -> usize {
    let pos = if span > 0.0 { (v - min) / span } else { 0.5 };
    ((pos * (cells - 1) as f64).round() as usize).min(cells - 1)
}

/// Format a scatter-style text chart of one or more series.
///
/// Later series are drawn on top of earlier ones. Non-finite values, and
/// non-positive values on a log scale, are skipped.
pub fn format_series_chart(title: &str, series: &[ChartSeries<'_>], style: &ChartStyle) -> String {
    let mut output = String::new();
    let scale = if style.log_scale { " (log scale)" } else { "" };
    output.push_str(&format!("\n{}\n", format!("{title}{scale}").bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(style.width + LABEL_WIDTH + 2)));

    let points: Vec<(char, f64, f64)> = series
        .iter()
        .flat_map(|s| {
            s.days
                .iter()
                .zip(s.values)
                .filter_map(move |(d, v)| to_axis(*v, style.log_scale).map(|y| (s.marker, *d, y)))
        })
        .collect();

    if points.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, x, y) in &points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let width = style.width.max(2);
    let height = style.height.max(2);
    let mut grid = vec![vec![' '; width]; height];
    for &(marker, x, y) in &points {
        let col = cell(x, x_min, x_max - x_min, width);
        let row = cell(y, y_min, y_max - y_min, height);
        grid[height - 1 - row][col] = marker;
    }

    for (r, line) in grid.iter().enumerate() {
        let label = if r == 0 {
            compact(from_axis(y_max, style.log_scale))
        } else if r == height - 1 {
            compact(from_axis(y_min, style.log_scale))
        } else {
            String::new()
        };
        let line: String = line.iter().collect();
        output.push_str(&format!("{label:>LABEL_WIDTH$} │{}\n", line.trim_end()));
    }
    output.push_str(&format!("{:>LABEL_WIDTH$} └{}\n", "", "─".repeat(width)));

    let left = format!("day {x_min:.0}");
    let right = format!("day {x_max:.0}");
    let gap = width.saturating_sub(left.len() + right.len());
    output.push_str(&format!(
        "{:>LABEL_WIDTH$}  {left}{}{right}\n",
        "",
        " ".repeat(gap)
    ));

    let legend: Vec<String> = series
        .iter()
        .map(|s| format!("{} {}", s.marker, s.label))
        .collect();
    output.push_str(&format!("{:>LABEL_WIDTH$}  {}\n", "", legend.join("   ")));

    output
}

/// Print a text chart of one or more series.
pub fn print_series_chart(title: &str, series: &[ChartSeries<'_>], style: &ChartStyle) {
    print!("{}", format_series_chart(title, series, style));
}

/// Format the charts of a region report: cases with both models (linear and,
/// when enabled, log scale), daily increase, growth factor and death rate.
pub fn format_report_charts(report: &RegionReport, style: &ChartStyle) -> String {
    let label = report.label();
    let cases = [
        ChartSeries {
            label: "Exponential model",
            days: &report.exponential.days,
            values: &report.exponential.curve,
            marker: style.model_marker(0),
        },
        ChartSeries {
            label: "Logistic model",
            days: &report.logistic.days,
            values: &report.logistic.curve,
            marker: style.model_marker(1),
        },
        ChartSeries {
            label: "Real data",
            days: &report.days,
            values: &report.confirmed.values,
            marker: style.data_marker,
        },
    ];

    let linear = style.with_log_scale(false);
    let mut output = format_series_chart(&format!("{label} - Cases"), &cases, &linear);
    if style.log_scale {
        output.push_str(&format_series_chart(&format!("{label} - Cases"), &cases, style));
    }

    let single = |title: &str, days: &[f64], values: &[f64]| {
        format_series_chart(
            &format!("{label} - {title}"),
            &[ChartSeries {
                label: title,
                days,
                values,
                marker: style.data_marker,
            }],
            &linear,
        )
    };

    output.push_str(&single("Deaths", &report.days, &report.deaths.values));
    output.push_str(&single("Recovered", &report.days, &report.recovered.values));
    output.push_str(&single("Daily increase", &report.days, &report.evolution.increase));
    // The first two growth factors are sentinels
    let skip = report.num_days().min(2);
    output.push_str(&single(
        "Growth factor",
        &report.days[skip..],
        &report.evolution.growth_factor[skip..],
    ));
    output.push_str(&format_death_rate_chart(
        &format!("{label} - Death rate (%)"),
        &report.days,
        &report.death_rate,
        &linear,
    ));
    output
}

/// Print all charts of a region report.
pub fn print_report_charts(report: &RegionReport, style: &ChartStyle) {
    print!("{}", format_report_charts(report, style));
}

/// Format the lower and upper death-rate bounds as one two-series chart.
pub fn format_death_rate_chart(
    title: &str,
    days: &[f64],
    bounds: &DeathRateBounds,
    style: &ChartStyle,
) -> String {
    format_series_chart(
        title,
        &[
            ChartSeries {
                label: "Inf (deaths / confirmed)",
                days,
                values: &bounds.lower,
                marker: style.model_marker(0),
            },
            ChartSeries {
                label: "Sup (deaths / recovered)",
                days,
                values: &bounds.upper,
                marker: style.data_marker,
            },
        ],
        style,
    )
}

/// Format a chart of the world, focus country and rest-of-world totals.
pub fn format_totals_chart(title: &str, totals: &Totals, style: &ChartStyle) -> String {
    let days: Vec<f64> = (0..totals.world.len()).map(|d| d as f64).collect();
    format_series_chart(
        title,
        &[
            ChartSeries {
                label: "Worldwide",
                days: &days,
                values: &totals.world.values,
                marker: style.data_marker,
            },
            ChartSeries {
                label: &totals.focus.label,
                days: &days,
                values: &totals.focus.values,
                marker: style.model_marker(0),
            },
            ChartSeries {
                label: &totals.rest_of_world.label,
                days: &days,
                values: &totals.rest_of_world.values,
                marker: style.model_marker(1),
            },
        ],
        style,
    )
}
