//! Deserialization helpers for the loosely typed JSON the monitoring API returns.

use serde::{Deserialize, Deserializer};

/// Reads `null` (or a missing field, with `#[serde(default)]`) as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a non-negative count that the server may encode as an integer or a float.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    match value {
        None => Ok(0),
        Some(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|raw| raw.is_finite() && *raw >= 0.0 && raw.fract() == 0.0)
                    .map(|raw| raw as u64)
            })
            .ok_or_else(|| serde::de::Error::custom(format!("invalid count {number}"))),
    }
}
