use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::csv_io::report_rows;
use crate::analysis::RegionReport;
use crate::error::CaseError;

const SERIES_HEADERS: [&str; 11] = [
    "day",
    "date",
    "confirmed",
    "deaths",
    "recovered",
    "increase",
    "growth_factor",
    "exponential_model",
    "logistic_model",
    "death_rate_lower",
    "death_rate_upper",
];

/// Write a number, leaving the cell empty for undefined values.
fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
) -> Result<(), CaseError> {
    if let Some(v) = value.filter(|v| v.is_finite()) {
        worksheet.write_number(row, col, v)?;
    }
    Ok(())
}

fn write_series_sheet(worksheet: &mut Worksheet, report: &RegionReport) -> Result<(), CaseError> {
    let bold = Format::new().set_bold();
    worksheet.set_name("Series")?;
    for (col, header) in SERIES_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, row) in report_rows(report).iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_number(r, 0, row.day as f64)?;
        if let Some(date) = row.date {
            worksheet.write_string(r, 1, date.format("%Y-%m-%d").to_string())?;
        }
        let values = [
            Some(row.confirmed),
            Some(row.deaths),
            Some(row.recovered),
            Some(row.increase),
            Some(row.growth_factor),
            row.exponential_model,
            row.logistic_model,
            Some(row.death_rate_lower),
            Some(row.death_rate_upper),
        ];
        for (offset, value) in values.into_iter().enumerate() {
            write_value(worksheet, r, 2 + offset as u16, value)?;
        }
    }
    Ok(())
}

fn write_fit_sheet(worksheet: &mut Worksheet, report: &RegionReport) -> Result<(), CaseError> {
    let bold = Format::new().set_bold();
    worksheet.set_name("Fit")?;
    worksheet.write_string_with_format(0, 0, "parameter", &bold)?;
    worksheet.write_string_with_format(0, 1, "value", &bold)?;

    let exp = &report.exponential;
    let rows = [
        ("exponential_a", Some(exp.a)),
        ("exponential_b", Some(exp.b)),
        ("alpha", Some(exp.alpha)),
        ("r_squared", Some(exp.r_squared)),
        ("fit_start_day", Some(exp.start_index as f64)),
        ("doubling_period_days", exp.doubling_period()),
        ("a_ci_lower", exp.rate_interval.as_ref().map(|ci| ci.lower)),
        ("a_ci_upper", exp.rate_interval.as_ref().map(|ci| ci.upper)),
        ("logistic_ceiling", Some(report.logistic.ceiling)),
        ("logistic_final_value", Some(report.logistic.final_value())),
    ];

    worksheet.write_string(1, 0, "region")?;
    worksheet.write_string(1, 1, report.label())?;
    for (i, (name, value)) in rows.into_iter().enumerate() {
        let r = i as u32 + 2;
        worksheet.write_string(r, 0, name)?;
        write_value(worksheet, r, 1, value)?;
    }
    Ok(())
}

/// Write a region report to an Excel (.xlsx) workbook with a per-day
/// "Series" sheet and a "Fit" parameter sheet.
pub fn write_report_excel(report: &RegionReport, path: impl AsRef<Path>) -> Result<(), CaseError> {
    let mut workbook = Workbook::new();
    write_series_sheet(workbook.add_worksheet(), report)?;
    write_fit_sheet(workbook.add_worksheet(), report)?;
    workbook.save(path.as_ref())?;
    Ok(())
}
