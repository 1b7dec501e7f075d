use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RegionRecord;

/// Country treated separately in the standard aggregates.
pub const FOCUS_COUNTRY: &str = "China";

/// Daily totals summed over a selection of regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSeries {
    /// What the series covers, e.g. `"World"` or `"World w/o China"`
    pub label: String,
    pub values: Vec<f64>,
}

impl AggregateSeries {
    /// An all-zero series of `ndays` days.
    pub fn zeros(label: impl Into<String>, ndays: usize) -> Self {
        Self {
            label: label.into(),
            values: vec![0.0; ndays],
        }
    }

    /// Sum the first `len()` counts of every record matching `predicate`.
    ///
    /// Records must cover at least as many days as the series.
    pub(crate) fn accumulate<'a, I, P>(mut self, records: I, predicate: P) -> Self
    where
        I: IntoIterator<Item = &'a RegionRecord>,
        P: Fn(&RegionRecord) -> bool,
    {
        for record in records.into_iter().filter(|r| predicate(r)) {
            for (total, count) in self.values.iter_mut().zip(&record.counts) {
                *total += count;
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value on the last day, or 0 when empty.
    pub fn latest(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

/// The three standard aggregates of a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub world: AggregateSeries,
    pub focus: AggregateSeries,
    pub rest_of_world: AggregateSeries,
}

impl Totals {
    /// Compute world, focus-country and complement totals over `ndays` days.
    pub fn compute(records: &[RegionRecord], ndays: usize) -> Self {
        let world = AggregateSeries::zeros("World", ndays).accumulate(records, |_| true);
        let focus = AggregateSeries::zeros(FOCUS_COUNTRY, ndays)
            .accumulate(records, |r| r.is_country(FOCUS_COUNTRY));
        let rest_of_world = AggregateSeries::zeros(format!("World w/o {FOCUS_COUNTRY}"), ndays)
            .accumulate(records, |r| !r.is_country(FOCUS_COUNTRY));
        Self {
            world,
            focus,
            rest_of_world,
        }
    }
}

/// A parsed time-series feed: header dates, per-region rows and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseTable {
    /// Name of the feed, usually the file stem
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub records: Vec<RegionRecord>,
    pub totals: Totals,
}

impl CaseTable {
    /// Build a table and compute its totals.
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, records: Vec<RegionRecord>) -> Self {
        let totals = Totals::compute(&records, dates.len());
        Self {
            name: name.into(),
            dates,
            records,
            totals,
        }
    }

    /// Number of day columns.
    pub fn num_days(&self) -> usize {
        self.dates.len()
    }

    pub fn num_regions(&self) -> usize {
        self.records.len()
    }

    /// Day indices `0.0, 1.0, ..` matching the day columns.
    pub fn day_indices(&self) -> Vec<f64> {
        (0..self.num_days()).map(|d| d as f64).collect()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Distinct country names, sorted.
    pub fn countries(&self) -> Vec<&str> {
        let mut countries: Vec<&str> = self.records.iter().map(|r| r.country.as_str()).collect();
        countries.sort_unstable();
        countries.dedup();
        countries
    }
}
