use serde::{Deserialize, Serialize};

use crate::error::CaseError;

/// Daily bounds on the death rate, in percent.
///
/// Deaths over confirmed cases underestimates the final rate since open cases
/// may still die; deaths over recoveries overestimates it early on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathRateBounds {
    /// `100 * deaths / confirmed`
    #[serde(with = "crate::models::nan_as_null")]
    pub lower: Vec<f64>,
    /// `100 * deaths / recovered`
    #[serde(with = "crate::models::nan_as_null")]
    pub upper: Vec<f64>,
}

impl DeathRateBounds {
    /// Bounds on the last day, when both are defined.
    pub fn latest(&self) -> Option<(f64, f64)> {
        let lower = self.lower.last().copied().filter(|v| v.is_finite())?;
        let upper = self.upper.last().copied().filter(|v| v.is_finite())?;
        Some((lower, upper))
    }
}

fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        100.0 * numerator / denominator
    }
}

/// Compute lower and upper death-rate bounds. Days with a zero denominator
/// yield `NaN`.
pub fn death_rate_bounds(
    confirmed: &[f64],
    deaths: &[f64],
    recovered: &[f64],
) -> Result<DeathRateBounds, CaseError> {
    if confirmed.len() != deaths.len() || deaths.len() != recovered.len() {
        return Err(CaseError::InputError(format!(
            "series lengths differ: confirmed {}, deaths {}, recovered {}",
            confirmed.len(),
            deaths.len(),
            recovered.len()
        )));
    }

    Ok(DeathRateBounds {
        lower: deaths.iter().zip(confirmed).map(|(d, c)| percent(*d, *c)).collect(),
        upper: deaths.iter().zip(recovered).map(|(d, r)| percent(*d, *r)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let b = death_rate_bounds(&[100.0, 200.0], &[2.0, 6.0], &[20.0, 60.0]).unwrap();
        assert_eq!(b.lower, vec![2.0, 3.0]);
        assert_eq!(b.upper, vec![10.0, 10.0]);
        assert_eq!(b.latest(), Some((3.0, 10.0)));
    }

    #[test]
    fn test_zero_denominator_is_nan() {
        let b = death_rate_bounds(&[0.0, 10.0], &[0.0, 1.0], &[0.0, 0.0]).unwrap();
        assert!(b.lower[0].is_nan());
        assert_eq!(b.lower[1], 10.0);
        assert!(b.upper[1].is_nan());
        assert!(b.latest().is_none());
    }

    #[test]
    fn test_length_mismatch() {
        let err = death_rate_bounds(&[1.0], &[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, CaseError::InputError(_)));
    }
}
