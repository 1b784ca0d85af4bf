//! Hour selection choices for the backtest form.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike};

use super::payload::{HourInfo, PriceSample};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourOption {
    pub value: String,
    pub label: String,
}

/// Sort by hour string and label each choice with its trade count.
///
/// Lexical order equals chronological order for zero-padded `HH` values.
pub fn hour_options(hours: &[HourInfo]) -> Vec<HourOption> {
    let mut sorted: Vec<&HourInfo> = hours.iter().collect();
    sorted.sort_by(|a, b| a.hour.cmp(&b.hour));
    sorted
        .into_iter()
        .map(|info| HourOption {
            value: info.hour.clone(),
            label: format!("{}:00 ({} trades)", info.hour, info.count),
        })
        .collect()
}

/// Count samples per UTC hour of day, as an hours listing would report them.
pub fn hours_from_prices(samples: &[PriceSample]) -> Vec<HourInfo> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for sample in samples {
        if let Some(dt) = DateTime::from_timestamp_millis(sample.time) {
            *counts.entry(dt.hour()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(hour, count)| HourInfo {
            hour: format!("{hour:02}"),
            count,
        })
        .collect()
}
