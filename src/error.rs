use thiserror::Error;

/// Errors that can occur while loading and analyzing case time series.
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Fit error: {0}")]
    FitError(String),

    #[error("Input error: {0}")]
    InputError(String),
}

impl From<rust_xlsxwriter::XlsxError> for CaseError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        CaseError::Excel(e.to_string())
    }
}
