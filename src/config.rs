use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::RegionQuery;
use crate::error::CaseError;

/// Terminal chart styling, passed explicitly to the chart renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Plot area width in characters
    pub width: usize,
    /// Plot area height in rows
    pub height: usize,
    /// Marker for observed data
    pub data_marker: char,
    /// Markers for model curves, in drawing order
    pub model_markers: Vec<char>,
    /// Also draw case curves on a log10 y axis
    pub log_scale: bool,
    /// Number of trailing days listed in the evolution table
    pub table_days: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 72,
            height: 16,
            data_marker: '●',
            model_markers: vec!['·', '+', 'x'],
            log_scale: true,
            table_days: 10,
        }
    }
}

impl ChartStyle {
    /// Marker for the `i`-th model curve, cycling through `model_markers`.
    pub fn model_marker(&self, i: usize) -> char {
        if self.model_markers.is_empty() {
            '*'
        } else {
            self.model_markers[i % self.model_markers.len()]
        }
    }

    pub fn with_log_scale(&self, log_scale: bool) -> Self {
        Self {
            log_scale,
            ..self.clone()
        }
    }
}

/// Analysis settings loaded from a TOML file.
///
/// ```toml
/// [chart]
/// width = 60
/// log_scale = false
///
/// [[regions]]
/// country = "France"
/// ceiling = 300000.0
///
/// [[regions]]
/// country = "China"
/// ceiling = 1000000.0
/// exclude = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub chart: ChartStyle,
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionQuery>,
}

/// Regions analyzed when no configuration names any.
pub fn default_regions() -> Vec<RegionQuery> {
    vec![
        RegionQuery::new("France", 3e5),
        RegionQuery::new("Italy", 6e5),
        RegionQuery::new("US", 1e6),
        RegionQuery::new("China", 8.2e4).stop_exp(20),
        RegionQuery::new("China", 1e6).exclude(),
    ]
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            chart: ChartStyle::default(),
            regions: default_regions(),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CaseError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, CaseError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CaseError> {
        if self.chart.width < 8 || self.chart.height < 4 {
            return Err(CaseError::InputError(format!(
                "chart must be at least 8x4, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        if let Some(q) = self.regions.iter().find(|q| q.ceiling <= 0.0) {
            return Err(CaseError::InputError(format!(
                "{}: ceiling must be positive, got {}",
                q.label(),
                q.ceiling
            )));
        }
        Ok(())
    }
}
