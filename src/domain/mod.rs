//! Core domain types and logic: payload model, round-trip reconstruction,
//! chart composition, metrics and presentation.

pub mod payload;
pub mod lenient;
pub mod time_align;
pub mod round_trip;
pub mod chart;
pub mod metrics;
pub mod presenter;
pub mod hours;
pub mod status;
pub mod format;
pub mod error;
