//! Epoch-millisecond to epoch-second conversion for chart x-axes.

const MILLIS_PER_SECOND: f64 = 1000.0;

/// Epoch millis to epoch seconds, keeping fractional seconds.
pub fn align(millis: i64) -> f64 {
    millis as f64 / MILLIS_PER_SECOND
}

/// Inverse of [`align`]. `NaN` in, `NaN` out.
pub fn align_inverse(seconds: f64) -> f64 {
    seconds * MILLIS_PER_SECOND
}

/// Align a whole stream, preserving order.
pub fn align_all<I>(millis: I) -> Vec<f64>
where
    I: IntoIterator<Item = i64>,
{
    millis.into_iter().map(align).collect()
}
