//! Serde adapter writing non-finite values of a `Vec<f64>` as `null` and
//! reading `null` back as `NaN`, so undefined ratios survive a JSON round trip.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    values
        .iter()
        .map(|v| v.is_finite().then_some(*v))
        .collect::<Vec<Option<f64>>>()
        .serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let values = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
