use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{
    death_rate_bounds, evolution, fit_exponential, fit_logistic, select, selection_label,
    DeathRateBounds, EvolutionMetrics, ExponentialFit, LogisticFit,
};
use crate::error::CaseError;
use crate::models::{AggregateSeries, CaseTable};

/// Confirmed, death and recovery feeds covering the same days.
#[derive(Debug, Clone)]
pub struct CaseDataset {
    pub confirmed: CaseTable,
    pub deaths: CaseTable,
    pub recovered: CaseTable,
}

impl CaseDataset {
    /// Bundle three feeds, checking that they cover the same number of days.
    pub fn new(
        confirmed: CaseTable,
        deaths: CaseTable,
        recovered: CaseTable,
    ) -> Result<Self, CaseError> {
        let ndays = confirmed.num_days();
        for table in [&deaths, &recovered] {
            if table.num_days() != ndays {
                return Err(CaseError::InputError(format!(
                    "{} covers {} days but {} covers {ndays}",
                    table.name,
                    table.num_days(),
                    confirmed.name
                )));
            }
        }
        Ok(Self {
            confirmed,
            deaths,
            recovered,
        })
    }

    pub fn num_days(&self) -> usize {
        self.confirmed.num_days()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.confirmed.start_date()
    }
}

/// Which region to analyze and with which model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionQuery {
    pub country: String,
    /// Estimated final number of cases for the logistic model
    pub ceiling: f64,
    /// Fit the exponential model on the first `stop_exp` days only.
    /// `Some(0)` means no truncation.
    #[serde(default)]
    pub stop_exp: Option<usize>,
    /// Analyze every region except `country`
    #[serde(default)]
    pub exclude: bool,
}

impl RegionQuery {
    pub fn new(country: impl Into<String>, ceiling: f64) -> Self {
        Self {
            country: country.into(),
            ceiling,
            stop_exp: None,
            exclude: false,
        }
    }

    pub fn stop_exp(mut self, days: usize) -> Self {
        self.stop_exp = Some(days);
        self
    }

    pub fn exclude(mut self) -> Self {
        self.exclude = true;
        self
    }

    pub fn label(&self) -> String {
        selection_label(&self.country, self.exclude)
    }
}

/// Everything computed for one region selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionReport {
    pub query: RegionQuery,
    pub start_date: Option<NaiveDate>,
    pub days: Vec<f64>,
    pub confirmed: AggregateSeries,
    pub deaths: AggregateSeries,
    pub recovered: AggregateSeries,
    pub exponential: ExponentialFit,
    pub logistic: LogisticFit,
    pub evolution: EvolutionMetrics,
    pub death_rate: DeathRateBounds,
}

impl RegionReport {
    pub fn label(&self) -> String {
        self.query.label()
    }

    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    /// Calendar date of a day index.
    pub fn date_of(&self, day: usize) -> Option<NaiveDate> {
        self.start_date
            .and_then(|d| d.checked_add_signed(chrono::Duration::days(day as i64)))
    }
}

/// Latest totals for one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub label: String,
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
}

impl CaseSummary {
    fn from_series(
        confirmed: &AggregateSeries,
        deaths: &AggregateSeries,
        recovered: &AggregateSeries,
    ) -> Self {
        Self {
            label: confirmed.label.clone(),
            confirmed: confirmed.latest(),
            deaths: deaths.latest(),
            recovered: recovered.latest(),
        }
    }
}

/// Death-rate bounds over time for one aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateDeathRate {
    pub label: String,
    pub bounds: DeathRateBounds,
}

impl AggregateDeathRate {
    fn from_series(
        confirmed: &AggregateSeries,
        deaths: &AggregateSeries,
        recovered: &AggregateSeries,
    ) -> Result<Self, CaseError> {
        Ok(Self {
            label: confirmed.label.clone(),
            bounds: death_rate_bounds(&confirmed.values, &deaths.values, &recovered.values)?,
        })
    }
}

/// Unified analysis API over a loaded dataset.
pub struct RegionAnalyzer<'a> {
    dataset: &'a CaseDataset,
}

impl<'a> RegionAnalyzer<'a> {
    pub fn new(dataset: &'a CaseDataset) -> Self {
        Self { dataset }
    }

    /// Latest totals for the world, the focus country and the rest.
    pub fn world_summary(&self) -> Vec<CaseSummary> {
        let c = &self.dataset.confirmed.totals;
        let d = &self.dataset.deaths.totals;
        let r = &self.dataset.recovered.totals;
        vec![
            CaseSummary::from_series(&c.world, &d.world, &r.world),
            CaseSummary::from_series(&c.focus, &d.focus, &r.focus),
            CaseSummary::from_series(&c.rest_of_world, &d.rest_of_world, &r.rest_of_world),
        ]
    }

    /// Death-rate bounds for the world, the focus country and the rest.
    pub fn world_death_rates(&self) -> Result<Vec<AggregateDeathRate>, CaseError> {
        let c = &self.dataset.confirmed.totals;
        let d = &self.dataset.deaths.totals;
        let r = &self.dataset.recovered.totals;
        Ok(vec![
            AggregateDeathRate::from_series(&c.world, &d.world, &r.world)?,
            AggregateDeathRate::from_series(&c.focus, &d.focus, &r.focus)?,
            AggregateDeathRate::from_series(&c.rest_of_world, &d.rest_of_world, &r.rest_of_world)?,
        ])
    }

    /// Select the region, fit both models and compute evolution metrics.
    pub fn analyze(&self, query: &RegionQuery) -> Result<RegionReport, CaseError> {
        let ndays = self.dataset.num_days();
        let days = self.dataset.confirmed.day_indices();

        let confirmed = select(
            &self.dataset.confirmed.records,
            &query.country,
            ndays,
            query.exclude,
        )?;
        let deaths = select(&self.dataset.deaths.records, &query.country, ndays, query.exclude)?;
        let recovered = select(
            &self.dataset.recovered.records,
            &query.country,
            ndays,
            query.exclude,
        )?;

        let fit_days = match query.stop_exp {
            Some(n) if n > 0 => n.min(ndays),
            _ => ndays,
        };
        let exponential = fit_exponential(&days[..fit_days], &confirmed.values[..fit_days])?;
        let logistic = fit_logistic(&days, exponential.alpha, query.ceiling, &confirmed.values)?;
        let evolution = evolution(&days, &confirmed.values)?;
        let death_rate = death_rate_bounds(&confirmed.values, &deaths.values, &recovered.values)?;

        info!(
            region = %query.label(),
            alpha = exponential.alpha,
            r_squared = exponential.r_squared,
            "analyzed region"
        );

        Ok(RegionReport {
            query: query.clone(),
            start_date: self.dataset.start_date(),
            days,
            confirmed,
            deaths,
            recovered,
            exponential,
            logistic,
            evolution,
            death_rate,
        })
    }
}
