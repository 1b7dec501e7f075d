use crate::error::CaseError;
use crate::models::{AggregateSeries, RegionRecord};

/// Sum the first `ndays` counts of every record whose country equals
/// `country`, or of every other record when `exclude` is set.
///
/// Country matching is exact and case-sensitive; provinces are ignored.
/// No matching record yields an all-zero series.
///
/// # Examples
///
/// ```
/// use case_curve_analyzer::analysis::select;
/// use case_curve_analyzer::RegionRecord;
///
/// let records = vec![
///     RegionRecord::new("China", vec![1.0, 2.0]).with_province("Hubei"),
///     RegionRecord::new("China", vec![3.0, 4.0]).with_province("Anhui"),
///     RegionRecord::new("Italy", vec![5.0, 6.0]),
/// ];
/// let china = select(&records, "China", 2, false).unwrap();
/// assert_eq!(china.values, vec![4.0, 6.0]);
/// let rest = select(&records, "China", 2, true).unwrap();
/// assert_eq!(rest.values, vec![5.0, 6.0]);
/// ```
pub fn select(
    records: &[RegionRecord],
    country: &str,
    ndays: usize,
    exclude: bool,
) -> Result<AggregateSeries, CaseError> {
    if let Some(short) = records.iter().find(|r| r.num_days() < ndays) {
        return Err(CaseError::InputError(format!(
            "{} has {} days, {ndays} requested",
            short.display_name(),
            short.num_days()
        )));
    }

    Ok(AggregateSeries::zeros(selection_label(country, exclude), ndays)
        .accumulate(records, |r| r.is_country(country) != exclude))
}

/// Label used for a selection, e.g. `"World w/o China"`.
pub fn selection_label(country: &str, exclude: bool) -> String {
    if exclude {
        format!("World w/o {country}")
    } else {
        country.to_string()
    }
}
