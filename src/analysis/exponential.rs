use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::error::CaseError;

/// Cumulative count from which growth models start.
pub const CASE_THRESHOLD: f64 = 30.0;

/// Confidence level of the growth-rate interval.
const RATE_CONFIDENCE: f64 = 0.95;

/// Index of the first day whose count reaches [`CASE_THRESHOLD`].
pub fn threshold_index(cases: &[f64]) -> Result<usize, CaseError> {
    cases
        .iter()
        .position(|&c| c >= CASE_THRESHOLD)
        .ok_or_else(|| {
            CaseError::FitError(format!(
                "insufficient data: no day reaches {CASE_THRESHOLD} cases"
            ))
        })
}

pub(crate) fn check_lengths(days: &[f64], cases: &[f64]) -> Result<(), CaseError> {
    if days.len() != cases.len() {
        return Err(CaseError::InputError(format!(
            "{} days but {} case counts",
            days.len(),
            cases.len()
        )));
    }
    Ok(())
}

/// Confidence interval on the log-linear slope `a`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateInterval {
    pub std_error: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence_level: f64,
}

/// Result of fitting `ln(cases) = a * day + b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExponentialFit {
    pub a: f64,
    pub b: f64,
    /// Daily growth rate, `exp(a) - 1`
    pub alpha: f64,
    /// Coefficient of determination on the log-transformed data
    pub r_squared: f64,
    /// First day index included in the fit
    pub start_index: usize,
    pub days: Vec<f64>,
    /// Non-finite values from degenerate parameters serialize as `null`
    #[serde(with = "crate::models::nan_as_null")]
    pub curve: Vec<f64>,
    /// Only present when at least three points were fitted
    pub rate_interval: Option<RateInterval>,
}

impl ExponentialFit {
    /// Days needed for the fitted curve to double, when it grows at all.
    pub fn doubling_period(&self) -> Option<f64> {
        (self.a > 0.0).then(|| std::f64::consts::LN_2 / self.a)
    }

    /// Evaluate the fitted curve at an arbitrary day.
    pub fn predict(&self, day: f64) -> f64 {
        (self.a * day + self.b).exp()
    }

    pub fn num_points(&self) -> usize {
        self.days.len()
    }
}

/// Fit an exponential curve to the counts from the first day reaching
/// [`CASE_THRESHOLD`] onwards.
///
/// Pass a prefix of `days`/`cases` to fit only an early growth phase.
///
/// # Examples
///
/// ```
/// use case_curve_analyzer::analysis::fit_exponential;
///
/// let days: Vec<f64> = (0..10).map(|d| d as f64).collect();
/// let cases: Vec<f64> = days.iter().map(|d| 40.0 * (0.2 * d).exp()).collect();
/// let fit = fit_exponential(&days, &cases).unwrap();
/// assert!((fit.a - 0.2).abs() < 1e-9);
/// assert!((fit.r_squared - 1.0).abs() < 1e-9);
/// ```
pub fn fit_exponential(days: &[f64], cases: &[f64]) -> Result<ExponentialFit, CaseError> {
    check_lengths(days, cases)?;
    let start_index = threshold_index(cases)?;

    let x = &days[start_index..];
    let observed = &cases[start_index..];
    if observed.iter().any(|&c| c <= 0.0) {
        return Err(CaseError::FitError("non-positive case count".to_string()));
    }
    if x.len() < 2 {
        return Err(CaseError::FitError(format!(
            "insufficient data: only {} point(s) from day {start_index}",
            x.len()
        )));
    }

    let y: Vec<f64> = observed.iter().map(|c| c.ln()).collect();

    let x_var = x.iter().variance();
    if x_var <= 0.0 {
        return Err(CaseError::FitError(
            "insufficient data: all days are identical".to_string(),
        ));
    }
    let a = x.iter().covariance(y.iter()) / x_var;
    let b = y.iter().mean() - a * x.iter().mean();

    let ss_res: f64 = x
        .iter()
        .zip(&y)
        .map(|(xi, yi)| (yi - (a * xi + b)).powi(2))
        .sum();
    let y_mean = y.iter().mean();
    let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res <= f64::EPSILON {
        1.0
    } else {
        0.0
    };

    let rate_interval = slope_interval(x, ss_res, a)?;
    let curve = x.iter().map(|d| (a * d + b).exp()).collect();
    let alpha = a.exp() - 1.0;

    debug!(start_index, a, b, alpha, r_squared, "fitted exponential model");

    Ok(ExponentialFit {
        a,
        b,
        alpha,
        r_squared,
        start_index,
        days: x.to_vec(),
        curve,
        rate_interval,
    })
}

/// Student-t interval on the regression slope.
fn slope_interval(x: &[f64], ss_res: f64, a: f64) -> Result<Option<RateInterval>, CaseError> {
    let n = x.len();
    if n < 3 {
        return Ok(None);
    }

    let x_mean = x.iter().mean();
    let sxx: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
    let df = (n - 2) as f64;
    let std_error = (ss_res / df / sxx).sqrt();

    let t_dist = StudentsT::new(0.0, 1.0, df).map_err(|e| CaseError::FitError(e.to_string()))?;
    let t_value = t_dist.inverse_cdf(1.0 - (1.0 - RATE_CONFIDENCE) / 2.0);
    let margin = t_value * std_error;

    Ok(Some(RateInterval {
        std_error,
        lower: a - margin,
        upper: a + margin,
        confidence_level: RATE_CONFIDENCE,
    }))
}
