use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use crate::analysis::RegionReport;
use crate::error::CaseError;
use crate::models::{CaseTable, RegionRecord};

/// Columns preceding the first date column: province, country, lat, long.
const LEADING_COLUMNS: usize = 4;

/// Date format used in the feed's header, e.g. `1/22/20`.
const HEADER_DATE_FORMAT: &str = "%m/%d/%y";

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

fn parse_header(header: &csv::StringRecord) -> Result<Vec<NaiveDate>, CaseError> {
    if header.len() <= LEADING_COLUMNS {
        return Err(CaseError::ParseError(format!(
            "malformed header: expected province, country, lat, long and at least one date, found {} column(s)",
            header.len()
        )));
    }

    header
        .iter()
        .skip(LEADING_COLUMNS)
        .map(|field| {
            NaiveDate::parse_from_str(field, HEADER_DATE_FORMAT).map_err(|e| {
                CaseError::ParseError(format!("malformed header: bad date column '{field}': {e}"))
            })
        })
        .collect()
}

fn parse_optional_f64(field: &str, line: u64, column: &str) -> Result<Option<f64>, CaseError> {
    if field.is_empty() {
        return Ok(None);
    }
    field.parse::<f64>().map(Some).map_err(|_| {
        CaseError::ParseError(format!("line {line}: invalid {column} '{field}'"))
    })
}

/// Validate one data row against the header shape and convert it.
fn parse_row(
    row: &csv::StringRecord,
    line: u64,
    expected_columns: usize,
) -> Result<RegionRecord, CaseError> {
    if row.len() != expected_columns {
        return Err(CaseError::ParseError(format!(
            "line {line}: {} column(s), header declares {expected_columns}",
            row.len()
        )));
    }

    let province = row.get(0).filter(|p| !p.is_empty()).map(str::to_string);
    let country = row.get(1).unwrap_or_default();
    if country.is_empty() {
        return Err(CaseError::ParseError(format!("line {line}: empty country")));
    }

    let latitude = parse_optional_f64(row.get(2).unwrap_or_default(), line, "latitude")?;
    let longitude = parse_optional_f64(row.get(3).unwrap_or_default(), line, "longitude")?;

    let counts = row
        .iter()
        .skip(LEADING_COLUMNS)
        .enumerate()
        .map(|(day, field)| match field.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(CaseError::ParseError(format!(
                "line {line}: invalid count '{field}' for day {day}"
            ))),
        })
        .collect::<Result<Vec<f64>, CaseError>>()?;

    Ok(RegionRecord {
        province,
        country: country.to_string(),
        latitude,
        longitude,
        counts,
    })
}

fn parse_time_series<R: Read>(
    rdr: &mut csv::Reader<R>,
    name: &str,
) -> Result<CaseTable, CaseError> {
    let header = rdr
        .headers()
        .map_err(|e| CaseError::ParseError(format!("malformed header: {e}")))?
        .clone();
    let dates = parse_header(&header)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| CaseError::ParseError(e.to_string()))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        records.push(parse_row(&row, line, header.len())?);
    }

    debug!(feed = name, regions = records.len(), days = dates.len(), "parsed time series");

    Ok(CaseTable::new(name, dates, records))
}

/// Read a case-count time series from a CSV file.
///
/// The header must be `Province/State, Country/Region, Lat, Long` followed by
/// one `M/D/YY` date per column. Every row must have exactly as many fields
/// as the header, and every count must be a non-negative number.
pub fn read_time_series(path: impl AsRef<Path>) -> Result<CaseTable, CaseError> {
    let path = path.as_ref();
    let mut rdr = reader_builder().from_path(path).map_err(|e| {
        CaseError::ParseError(format!("cannot open {}: {e}", path.display()))
    })?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    parse_time_series(&mut rdr, &name)
}

/// Read a case-count time series from CSV bytes.
pub fn read_time_series_from_bytes(data: &[u8], name: &str) -> Result<CaseTable, CaseError> {
    let mut rdr = reader_builder().from_reader(data);
    parse_time_series(&mut rdr, name)
}

/// One day of a region report, flattened for CSV export.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct ReportRow {
    pub day: usize,
    pub date: Option<NaiveDate>,
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
    pub increase: f64,
    pub growth_factor: f64,
    pub exponential_model: Option<f64>,
    pub logistic_model: Option<f64>,
    pub death_rate_lower: f64,
    pub death_rate_upper: f64,
}

/// Flatten a report into per-day rows. Model columns are empty outside the
/// fitted range.
pub(crate) fn report_rows(report: &RegionReport) -> Vec<ReportRow> {
    let exp = &report.exponential;
    let logistic = &report.logistic;

    (0..report.num_days())
        .map(|day| ReportRow {
            day,
            date: report.date_of(day),
            confirmed: report.confirmed.values[day],
            deaths: report.deaths.values[day],
            recovered: report.recovered.values[day],
            increase: report.evolution.increase[day],
            growth_factor: report.evolution.growth_factor[day],
            exponential_model: day
                .checked_sub(exp.start_index)
                .and_then(|i| exp.curve.get(i).copied()),
            logistic_model: day
                .checked_sub(logistic.start_index)
                .and_then(|i| logistic.curve.get(i).copied()),
            death_rate_lower: report.death_rate.lower[day],
            death_rate_upper: report.death_rate.upper[day],
        })
        .collect()
}

/// Write a region report as one CSV row per day.
pub fn write_report_csv(report: &RegionReport, path: impl AsRef<Path>) -> Result<(), CaseError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for row in report_rows(report) {
        wtr.serialize(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
