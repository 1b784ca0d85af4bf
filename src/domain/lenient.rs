//! Forgiving serde helpers for backtest payload fields.
//!
//! Numeric fields never fail to decode: anything that is not a number (or a
//! numeric string) becomes `NaN` and flows on into the arithmetic.
//! Timestamps are stricter since a chart axis has no slot for `NaN` time.
//! Flags accept booleans, numbers and boolean-like strings.

use chrono::DateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn nan() -> f64 {
    f64::NAN
}

pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

pub fn number<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(to_number(&value))
}

/// Read a side flag: non-zero numbers and `"true"`/`"1"` are set, `null`
/// and `""` are clear. Other strings, arrays and objects are rejected.
pub fn to_flag(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(false),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|x| x != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(format!("invalid flag {other:?}")),
        },
        other => Err(format!("invalid flag: {other}")),
    }
}

pub fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    to_flag(&value).map_err(D::Error::custom)
}

/// Parse a timestamp into epoch milliseconds.
///
/// Accepts integer or float millis, numeric strings, and RFC 3339 strings
/// (the form `time.Time` takes on the wire).
pub fn parse_timestamp(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => {
            if let Some(ms) = n.as_i64() {
                Ok(ms)
            } else {
                match n.as_f64() {
                    Some(ms) if ms.is_finite() => Ok(ms as i64),
                    _ => Err(format!("timestamp out of range: {n}")),
                }
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ms) = s.parse::<i64>() {
                return Ok(ms);
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp_millis())
                .map_err(|e| format!("invalid timestamp {s:?}: {e}"))
        }
        other => Err(format!("invalid timestamp: {other}")),
    }
}

pub fn timestamp_millis<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    parse_timestamp(&value).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_passes_through() {
        assert_eq!(to_number(&json!(110.5)), 110.5);
        assert_eq!(to_number(&json!(3)), 3.0);
    }

    #[test]
    fn numeric_string_is_parsed() {
        assert_eq!(to_number(&json!(" 42.25 ")), 42.25);
    }

    #[test]
    fn garbage_becomes_nan() {
        assert!(to_number(&json!("abc")).is_nan());
        assert!(to_number(&json!(null)).is_nan());
        assert!(to_number(&json!({"a": 1})).is_nan());
        assert!(to_number(&json!(true)).is_nan());
    }

    #[test]
    fn flag_from_bool_number_and_string() {
        assert!(to_flag(&json!(true)).unwrap());
        assert!(!to_flag(&json!(false)).unwrap());
        assert!(to_flag(&json!(1)).unwrap());
        assert!(to_flag(&json!(-2.5)).unwrap());
        assert!(!to_flag(&json!(0)).unwrap());
        assert!(to_flag(&json!("true")).unwrap());
        assert!(to_flag(&json!(" TRUE ")).unwrap());
        assert!(to_flag(&json!("1")).unwrap());
        assert!(!to_flag(&json!("false")).unwrap());
        assert!(!to_flag(&json!("")).unwrap());
        assert!(!to_flag(&json!(null)).unwrap());
    }

    #[test]
    fn flag_rejects_garbage() {
        assert!(to_flag(&json!("yes please")).is_err());
        assert!(to_flag(&json!([true])).is_err());
        assert!(to_flag(&json!({"buy": true})).is_err());
    }

    #[test]
    fn timestamp_from_integer_and_float() {
        assert_eq!(parse_timestamp(&json!(60000)).unwrap(), 60_000);
        assert_eq!(parse_timestamp(&json!(1500.0)).unwrap(), 1_500);
    }

    #[test]
    fn timestamp_from_rfc3339() {
        let ms = parse_timestamp(&json!("2025-09-20T10:00:00Z")).unwrap();
        assert_eq!(ms, 1_758_362_400_000);
    }

    #[test]
    fn timestamp_with_offset() {
        let ms = parse_timestamp(&json!("2025-09-20T12:00:00+02:00")).unwrap();
        assert_eq!(ms, 1_758_362_400_000);
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(parse_timestamp(&json!("yesterday")).is_err());
        assert!(parse_timestamp(&json!(null)).is_err());
        assert!(parse_timestamp(&json!([1, 2])).is_err());
    }
}
