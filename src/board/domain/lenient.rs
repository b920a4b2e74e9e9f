//! Tolerant decoding of remote scalar values.
//!
//! The board API is loosely typed: identifiers, positions and timestamps
//! arrive as JSON numbers or as numeric strings depending on the endpoint,
//! and `false` or `null` stand for "nothing". These helpers normalise
//! those encodings at the serde boundary.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Bool(bool),
    Text(String),
}

/// Decodes an optional integer from a number, numeric string, `false` or
/// `null`. Blank strings and `false` decode to `None`.
pub(crate) fn optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None | Some(Scalar::Bool(false)) => Ok(None),
        Some(Scalar::Int(value)) => Ok(Some(value)),
        Some(Scalar::Bool(true)) => Err(de::Error::custom("expected an integer, found `true`")),
        Some(Scalar::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|err| de::Error::custom(format!("invalid integer '{trimmed}': {err}")))
        }
    }
}

/// Decodes a required integer.
pub(crate) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    optional_int(deserializer)?.ok_or_else(|| de::Error::custom("missing integer value"))
}

/// Decodes an integer, treating absent values as `0`.
pub(crate) fn int_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_int(deserializer)?.unwrap_or_default())
}

/// Decodes a 1-based column position.
pub(crate) fn position<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = int(deserializer)?;
    u32::try_from(raw).map_err(|_| de::Error::custom(format!("position {raw} out of range")))
}

/// Decodes a Unix timestamp that must fit the persisted 32-bit watermark.
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = int_or_zero(deserializer)?;
    i32::try_from(raw).map_err(|_| de::Error::custom(format!("timestamp {raw} out of range")))
}

/// Decodes a string that may be `null` or missing.
pub(crate) fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
