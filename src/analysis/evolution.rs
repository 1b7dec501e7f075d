use serde::{Deserialize, Serialize};

use super::exponential::check_lengths;
use crate::error::CaseError;

/// Day-over-day change of a cumulative series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionMetrics {
    /// First derivative of the cumulative counts (new cases per day)
    pub increase: Vec<f64>,
    /// Ratio of successive daily increases. Zero for the first two days,
    /// `NaN` where the previous increase is zero.
    #[serde(with = "crate::models::nan_as_null")]
    pub growth_factor: Vec<f64>,
}

impl EvolutionMetrics {
    pub fn len(&self) -> usize {
        self.increase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.increase.is_empty()
    }

    /// Growth factor on the last day, if it is defined.
    pub fn latest_growth_factor(&self) -> Option<f64> {
        self.growth_factor
            .last()
            .copied()
            .filter(|g| g.is_finite() && self.len() > 2)
    }
}

/// Compute daily increase and growth factor.
///
/// Interior points use a centered difference, the first and last points
/// second-order one-sided stencils. Needs at least three days.
pub fn evolution(days: &[f64], cases: &[f64]) -> Result<EvolutionMetrics, CaseError> {
    check_lengths(days, cases)?;
    let n = cases.len();
    if n < 3 {
        return Err(CaseError::InputError(format!(
            "need at least 3 days for evolution metrics, got {n}"
        )));
    }

    let mut increase = vec![0.0; n];
    for t in 1..n - 1 {
        increase[t] = (cases[t + 1] - cases[t - 1]) / 2.0;
    }
    increase[0] = (-3.0 * cases[0] + 4.0 * cases[1] - cases[2]) / 2.0;
    increase[n - 1] = (3.0 * cases[n - 1] - 4.0 * cases[n - 2] + cases[n - 3]) / 2.0;

    let mut growth_factor = vec![0.0; n];
    for t in 2..n {
        growth_factor[t] = if increase[t - 1] == 0.0 {
            f64::NAN
        } else {
            increase[t] / increase[t - 1]
        };
    }

    Ok(EvolutionMetrics {
        increase,
        growth_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn days(n: usize) -> Vec<f64> {
        (0..n).map(|d| d as f64).collect()
    }

    #[test]
    fn test_linear_series_constant_increase() {
        let cases: Vec<f64> = days(6).iter().map(|t| 4.0 * t + 7.0).collect();
        let evo = evolution(&days(6), &cases).unwrap();
        for inc in &evo.increase {
            assert_approx_eq!(*inc, 4.0, 1e-12);
        }
        assert_eq!(evo.growth_factor[0], 0.0);
        assert_eq!(evo.growth_factor[1], 0.0);
        for g in &evo.growth_factor[2..] {
            assert_approx_eq!(*g, 1.0, 1e-12);
        }
    }

    #[test]
    fn test_quadratic_series_exact() {
        // Second-order stencils are exact for quadratics: d/dt t^2 = 2t
        let cases: Vec<f64> = days(5).iter().map(|t| t * t).collect();
        let evo = evolution(&days(5), &cases).unwrap();
        for (t, inc) in evo.increase.iter().enumerate() {
            assert_approx_eq!(*inc, 2.0 * t as f64, 1e-12);
        }
    }

    #[test]
    fn test_length_preserved() {
        let cases = [10.0, 15.0, 22.0, 33.0, 49.0, 73.0, 100.0, 150.0];
        let evo = evolution(&days(8), &cases).unwrap();
        assert_eq!(evo.len(), 8);
        assert_eq!(evo.growth_factor.len(), 8);
    }

    #[test]
    fn test_too_few_points() {
        let err = evolution(&days(2), &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, CaseError::InputError(_)));
    }

    #[test]
    fn test_length_mismatch() {
        let err = evolution(&days(4), &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, CaseError::InputError(_)));
    }

    #[test]
    fn test_flat_series_undefined_growth_factor() {
        let evo = evolution(&days(4), &[5.0, 5.0, 5.0, 5.0]).unwrap();
        assert!(evo.growth_factor[2].is_nan());
        assert!(evo.latest_growth_factor().is_none());
    }

    #[test]
    fn test_latest_growth_factor() {
        let cases: Vec<f64> = days(6).iter().map(|t| 2f64.powf(*t)).collect();
        let evo = evolution(&days(6), &cases).unwrap();
        let g = evo.latest_growth_factor().unwrap();
        assert!(g > 1.0);
    }
}
