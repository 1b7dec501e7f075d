use serde::{Deserialize, Serialize};

/// One row of the time-series feed: a province (or a whole country) and its
/// cumulative daily counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Province or state; `None` when the row covers the whole country
    pub province: Option<String>,
    /// Country or region name, repeated across provinces of the same country
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Cumulative counts, one per day, oldest first
    pub counts: Vec<f64>,
}

impl RegionRecord {
    /// Create a country-level record with no province or coordinates.
    pub fn new(country: impl Into<String>, counts: Vec<f64>) -> Self {
        Self {
            province: None,
            country: country.into(),
            latitude: None,
            longitude: None,
            counts,
        }
    }

    /// Attach a province name.
    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    /// Number of days covered.
    pub fn num_days(&self) -> usize {
        self.counts.len()
    }

    /// Count on the last available day, or 0 for an empty record.
    pub fn latest(&self) -> f64 {
        self.counts.last().copied().unwrap_or(0.0)
    }

    /// Human-readable name, e.g. `"Hubei, China"` or `"France"`.
    pub fn display_name(&self) -> String {
        match &self.province {
            Some(p) => format!("{p}, {}", self.country),
            None => self.country.clone(),
        }
    }

    /// Exact, case-sensitive comparison on the country field.
    pub fn is_country(&self, country: &str) -> bool {
        self.country == country
    }
}
