use std::path::Path;

use crate::analysis::RegionReport;
use crate::error::CaseError;

/// Read a region report previously written with [`write_report_json`].
pub fn read_report_json(path: impl AsRef<Path>) -> Result<RegionReport, CaseError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    read_report_json_from_bytes(content.as_bytes())
}

fn check_len(field: &str, len: usize, expected: usize) -> Result<(), CaseError> {
    if len != expected {
        return Err(CaseError::ParseError(format!(
            "report field {field} has {len} values, expected {expected}"
        )));
    }
    Ok(())
}

/// Check that every per-day vector covers the report's days and that each
/// model curve matches its own fitted days.
fn validate_report(report: &RegionReport) -> Result<(), CaseError> {
    let ndays = report.days.len();
    check_len("confirmed.values", report.confirmed.values.len(), ndays)?;
    check_len("deaths.values", report.deaths.values.len(), ndays)?;
    check_len("recovered.values", report.recovered.values.len(), ndays)?;
    check_len("evolution.increase", report.evolution.increase.len(), ndays)?;
    check_len("evolution.growth_factor", report.evolution.growth_factor.len(), ndays)?;
    check_len("death_rate.lower", report.death_rate.lower.len(), ndays)?;
    check_len("death_rate.upper", report.death_rate.upper.len(), ndays)?;

    let exp = &report.exponential;
    check_len("exponential.curve", exp.curve.len(), exp.days.len())?;
    let logistic = &report.logistic;
    check_len("logistic.curve", logistic.curve.len(), logistic.days.len())?;
    for (name, start, points) in [
        ("exponential", exp.start_index, exp.days.len()),
        ("logistic", logistic.start_index, logistic.days.len()),
    ] {
        if start + points > ndays {
            return Err(CaseError::ParseError(format!(
                "{name} fit covers days {start}..{} beyond the report's {ndays} days",
                start + points
            )));
        }
    }
    Ok(())
}

/// Read a region report from JSON bytes.
///
/// Reports whose series lengths disagree are rejected with a `ParseError`.
pub fn read_report_json_from_bytes(data: &[u8]) -> Result<RegionReport, CaseError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| CaseError::ParseError(format!("Invalid UTF-8: {e}")))?;
    let report: RegionReport = serde_json::from_str(content)?;
    validate_report(&report)?;
    Ok(report)
}

/// Write a region report as JSON.
///
/// Undefined and non-finite values (growth factors, death rates, diverging
/// model curves) are written as `null`.
pub fn write_report_json(
    report: &RegionReport,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), CaseError> {
    let content = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
