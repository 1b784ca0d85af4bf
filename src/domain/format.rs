//! Display formatting for metric cards and the trade table.

use chrono::DateTime;

pub const INVALID_DATE: &str = "Invalid Date";

/// Extra digits printed when checking for an exact halfway value. Any double
/// that is not a tie sits further than this from the nearest one.
const TIE_GUARD_DIGITS: usize = 30;

/// Fixed-point with `NaN`/`Infinity`/`-Infinity` spelled out.
///
/// Exact halfway values round away from zero (`0.125` gives `0.13`), and
/// negative zero prints without a sign.
pub fn fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let mut magnitude = value.abs();
    if is_tie(magnitude, decimals) {
        magnitude = f64::from_bits(magnitude.to_bits() + 1);
    }
    format!("{sign}{magnitude:.decimals$}")
}

/// True when the exact decimal expansion is `5` then zeros past `decimals`.
fn is_tie(magnitude: f64, decimals: usize) -> bool {
    let exact = format!("{magnitude:.prec$}", prec = decimals + TIE_GUARD_DIGITS);
    let tail = &exact[exact.len() - TIE_GUARD_DIGITS..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

/// Shortest representation, e.g. `100`, `100.5`.
pub fn plain(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        fixed(value, 0)
    }
}

pub fn dollars(value: f64, decimals: usize) -> String {
    format!("${}", fixed(value, decimals))
}

pub fn percent(value: f64) -> String {
    format!("{}%", fixed(value, 2))
}

/// Epoch millis as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn timestamp(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => INVALID_DATE.to_string(),
    }
}
