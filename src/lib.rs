pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

pub use analysis::{CaseDataset, RegionAnalyzer, RegionQuery, RegionReport};
pub use config::{AnalysisConfig, ChartStyle};
pub use error::CaseError;
pub use io::ReportWriter;
pub use models::{AggregateSeries, CaseTable, RegionRecord, Totals};
