mod csv_io;
mod json_io;
mod excel_io;

use std::path::{Path, PathBuf};

use crate::analysis::{CaseDataset, RegionReport};
use crate::error::CaseError;

pub use csv_io::{read_time_series, read_time_series_from_bytes, write_report_csv};
pub use json_io::{read_report_json, read_report_json_from_bytes, write_report_json};
pub use excel_io::write_report_excel;

/// File name prefix of the feed's time-series files.
pub const DEFAULT_FILE_PREFIX: &str = "time_series_19-covid-";

/// Paths of the confirmed, deaths and recovered files in a data directory,
/// named `<prefix>Confirmed.csv`, `<prefix>Deaths.csv`, `<prefix>Recovered.csv`.
pub fn dataset_paths(dir: &Path, prefix: &str) -> [PathBuf; 3] {
    ["Confirmed", "Deaths", "Recovered"].map(|kind| dir.join(format!("{prefix}{kind}.csv")))
}

/// Load the three feeds of a data directory.
pub fn load_dataset(dir: impl AsRef<Path>, prefix: &str) -> Result<CaseDataset, CaseError> {
    let [confirmed, deaths, recovered] = dataset_paths(dir.as_ref(), prefix);
    CaseDataset::new(
        read_time_series(confirmed)?,
        read_time_series(deaths)?,
        read_time_series(recovered)?,
    )
}

/// Trait for writing a region report to a file.
pub trait ReportWriter {
    fn write(&self, report: &RegionReport, path: &Path) -> Result<(), CaseError>;
}

/// CSV format writer, one row per day.
pub struct CsvFormat;

impl ReportWriter for CsvFormat {
    fn write(&self, report: &RegionReport, path: &Path) -> Result<(), CaseError> {
        write_report_csv(report, path)
    }
}

/// JSON format writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl ReportWriter for JsonFormat {
    fn write(&self, report: &RegionReport, path: &Path) -> Result<(), CaseError> {
        write_report_json(report, path, self.pretty)
    }
}

/// Excel (.xlsx) format writer.
pub struct ExcelFormat;

impl ReportWriter for ExcelFormat {
    fn write(&self, report: &RegionReport, path: &Path) -> Result<(), CaseError> {
        write_report_excel(report, path)
    }
}

/// Pick a writer from the output file extension.
pub fn writer_for(path: &Path, pretty: bool) -> Result<Box<dyn ReportWriter>, CaseError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat { pretty })),
        "xlsx" => Ok(Box::new(ExcelFormat)),
        _ => Err(CaseError::InputError(format!(
            "Unsupported output format: .{ext}. Use .csv, .json, or .xlsx"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{RegionAnalyzer, RegionQuery};

    const CONFIRMED: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20,1/26/20,1/27/20
Hubei,China,30.9,112.2,40,60,90,130,200,300
,Italy,43.0,12.0,0,0,1,1,2,5
";
    const DEATHS: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20,1/26/20,1/27/20
Hubei,China,30.9,112.2,0,1,2,4,6,9
,Italy,43.0,12.0,0,0,0,0,0,0
";
    const RECOVERED: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20,1/26/20,1/27/20
Hubei,China,30.9,112.2,0,0,3,5,10,20
,Italy,43.0,12.0,0,0,0,0,0,0
";

    fn write_dataset(dir: &Path) {
        let [c, d, r] = dataset_paths(dir, DEFAULT_FILE_PREFIX);
        std::fs::write(c, CONFIRMED).unwrap();
        std::fs::write(d, DEATHS).unwrap();
        std::fs::write(r, RECOVERED).unwrap();
    }

    fn sample_report(dir: &Path) -> RegionReport {
        write_dataset(dir);
        let ds = load_dataset(dir, DEFAULT_FILE_PREFIX).unwrap();
        RegionAnalyzer::new(&ds)
            .analyze(&RegionQuery::new("China", 1000.0))
            .unwrap()
    }

    #[test]
    fn test_dataset_paths() {
        let [c, d, r] = dataset_paths(Path::new("data"), "ts-");
        assert_eq!(c, Path::new("data/ts-Confirmed.csv"));
        assert_eq!(d, Path::new("data/ts-Deaths.csv"));
        assert_eq!(r, Path::new("data/ts-Recovered.csv"));
    }

    #[test]
    fn test_load_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        let ds = load_dataset(dir.path(), DEFAULT_FILE_PREFIX).unwrap();
        assert_eq!(ds.num_days(), 6);
        assert_eq!(ds.deaths.totals.focus.latest(), 9.0);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path(), DEFAULT_FILE_PREFIX).unwrap_err();
        assert!(matches!(err, CaseError::ParseError(_)));
    }

    #[test]
    fn test_json_trait_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report(dir.path());
        let path = dir.path().join("report.json");

        let writer: &dyn ReportWriter = &JsonFormat { pretty: true };
        writer.write(&report, &path).unwrap();

        let loaded = read_report_json(&path).unwrap();
        assert_eq!(loaded.label(), "China");
        assert_eq!(loaded.confirmed.values, report.confirmed.values);
        assert_eq!(loaded.exponential.start_index, report.exponential.start_index);
        // days 0 and 1 carry the zero sentinel
        assert_eq!(loaded.evolution.growth_factor[0], 0.0);
    }

    #[test]
    fn test_json_undefined_values_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report(dir.path());
        assert!(report.death_rate.upper[0].is_nan());

        let path = dir.path().join("report.json");
        write_report_json(&report, &path, false).unwrap();
        let loaded = read_report_json(&path).unwrap();
        assert!(loaded.death_rate.upper[0].is_nan());
        assert_eq!(loaded.death_rate.upper[5], report.death_rate.upper[5]);
    }

    #[test]
    fn test_json_degenerate_ceiling_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        let ds = load_dataset(dir.path(), DEFAULT_FILE_PREFIX).unwrap();
        let report = RegionAnalyzer::new(&ds)
            .analyze(&RegionQuery::new("China", 0.0))
            .unwrap();
        assert!(report.logistic.curve[1].is_infinite());

        let path = dir.path().join("report.json");
        write_report_json(&report, &path, false).unwrap();
        let loaded = read_report_json(&path).unwrap();
        assert_eq!(loaded.logistic.curve.len(), report.logistic.curve.len());
        assert_eq!(loaded.logistic.curve[0], 40.0);
        assert!(loaded.logistic.curve[1..].iter().all(|v| v.is_nan()));
        assert_eq!(loaded.exponential.curve.len(), loaded.exponential.days.len());
    }

    /// Serialize a valid report, let `edit` damage it, and read it back.
    fn read_edited(edit: impl FnOnce(&mut serde_json::Value)) -> Result<RegionReport, CaseError> {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report(dir.path());
        let mut value = serde_json::to_value(&report).unwrap();
        edit(&mut value);
        read_report_json_from_bytes(value.to_string().as_bytes())
    }

    #[test]
    fn test_json_unchanged_report_accepted() {
        assert!(read_edited(|_| {}).is_ok());
    }

    #[test]
    fn test_json_short_series_rejected() {
        let fields: [&[&str]; 7] = [
            &["confirmed", "values"],
            &["deaths", "values"],
            &["recovered", "values"],
            &["evolution", "increase"],
            &["evolution", "growth_factor"],
            &["death_rate", "lower"],
            &["death_rate", "upper"],
        ];
        for path in fields {
            let err = read_edited(|v| {
                let target = path.iter().fold(v, |v, key| &mut v[*key]);
                *target = serde_json::json!([1.0, 2.0, 3.0]);
            })
            .unwrap_err();
            assert!(matches!(err, CaseError::ParseError(_)), "{path:?}");
            assert!(err.to_string().contains(&path.join(".")), "{path:?}: {err}");
        }
    }

    #[test]
    fn test_json_curve_mismatch_rejected() {
        for model in ["exponential", "logistic"] {
            let err = read_edited(|v| {
                v[model]["curve"].as_array_mut().unwrap().pop();
            })
            .unwrap_err();
            assert!(matches!(err, CaseError::ParseError(_)), "{model}");
            assert!(err.to_string().contains(&format!("{model}.curve")), "{model}: {err}");
        }
    }

    #[test]
    fn test_json_model_beyond_series_rejected() {
        let err = read_edited(|v| {
            v["logistic"]["start_index"] = serde_json::json!(3);
        })
        .unwrap_err();
        assert!(matches!(err, CaseError::ParseError(_)));
    }

    #[test]
    fn test_csv_writer_rows() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report(dir.path());
        let path = dir.path().join("report.csv");
        CsvFormat.write(&report, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "day");
        assert_eq!(&headers[7], "exponential_model");
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[0][1], "2020-01-22");
        assert_eq!(&rows[0][2], "40.0");
        // fit starts on day 0 since Hubei already has 40 cases
        assert!(!rows[0][7].is_empty());
    }

    #[test]
    fn test_excel_writer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report(dir.path());
        let path = dir.path().join("report.xlsx");
        ExcelFormat.write(&report, &path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_writer_for_extension() {
        assert!(writer_for(Path::new("a.csv"), false).is_ok());
        assert!(writer_for(Path::new("a.JSON"), true).is_ok());
        assert!(writer_for(Path::new("a.xlsx"), false).is_ok());
        let err = writer_for(Path::new("a.png"), false).err().unwrap();
        assert!(err.to_string().contains("Unsupported output format: .png"));
    }

    #[test]
    fn test_json_format_default() {
        let fmt = JsonFormat::default();
        assert!(!fmt.pretty);
    }
}
