mod tables;
mod charts;

pub use tables::{
    format_case_summary, print_case_summary,
    format_death_rate_summary, print_death_rate_summary,
    format_fit_summary, print_fit_summary,
    format_evolution_table, print_evolution_table,
};
pub use charts::{
    format_series_chart, print_series_chart,
    format_report_charts, print_report_charts,
    format_death_rate_chart, format_totals_chart, ChartSeries,
};
