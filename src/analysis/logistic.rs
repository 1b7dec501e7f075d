use serde::{Deserialize, Serialize};
use tracing::debug;

use super::exponential::{check_lengths, threshold_index};
use crate::error::CaseError;

/// Bounded-growth projection seeded from the observed counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticFit {
    /// First day index of the projection, same rule as the exponential fit
    pub start_index: usize,
    pub alpha: f64,
    /// Estimated total number of cases the curve saturates at
    pub ceiling: f64,
    pub days: Vec<f64>,
    /// Non-finite values from degenerate parameters serialize as `null`
    #[serde(with = "crate::models::nan_as_null")]
    pub curve: Vec<f64>,
}

impl LogisticFit {
    /// Last projected value.
    pub fn final_value(&self) -> f64 {
        self.curve.last().copied().unwrap_or(0.0)
    }

    /// Projected value as a fraction of the ceiling.
    pub fn saturation(&self) -> f64 {
        if self.ceiling > 0.0 {
            self.final_value() / self.ceiling
        } else {
            0.0
        }
    }
}

/// Project the discrete logistic recurrence
/// `n[t] = n[t-1] * (1 + alpha * (1 - n[t-1] / ceiling))`
/// from the first day the counts reach the case threshold.
///
/// The curve stays within `[0, ceiling]` for `-1 < alpha <= 1` and a seed
/// inside `(0, ceiling)`. Other parameters are accepted as given and may
/// produce overshooting, negative or oscillating values.
pub fn fit_logistic(
    days: &[f64],
    alpha: f64,
    ceiling: f64,
    cases: &[f64],
) -> Result<LogisticFit, CaseError> {
    check_lengths(days, cases)?;
    let start_index = threshold_index(cases)?;

    let model_days = days[start_index..].to_vec();
    let mut curve = Vec::with_capacity(model_days.len());
    let mut current = cases[start_index];
    curve.push(current);
    for _ in 1..model_days.len() {
        current *= 1.0 + alpha * (1.0 - current / ceiling);
        curve.push(current);
    }

    debug!(start_index, alpha, ceiling, points = curve.len(), "projected logistic model");

    Ok(LogisticFit {
        start_index,
        alpha,
        ceiling,
        days: model_days,
        curve,
    })
}
