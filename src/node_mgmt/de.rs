//! Lenient field deserializers
//!
//! Configuration files in the field are hand-edited, so numeric fields show up both as
//! JSON numbers and as numeric strings (`"baudrate": "9600"`), and identifiers such as
//! serial numbers show up as either strings or bare numbers.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON number or a numeric string
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    lenient_opt(deserializer)?.ok_or_else(|| D::Error::custom("expected a number, found null"))
}

/// Same as [`lenient`], with `null` mapped to `None`
pub fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.to_string().parse().map(Some).map_err(D::Error::custom),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
        Some(other) => Err(D::Error::custom(format!(
            "expected a number or numeric string, found {other}"
        ))),
    }
}

/// Accept a JSON string or number, keeping its textual form
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}
