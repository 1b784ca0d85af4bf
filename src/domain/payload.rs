//! Wire types exchanged with the backtest service.
//!
//! `BacktestResult` decodes section by section: a malformed `trades` array
//! leaves the trade log empty without discarding the equity curve, and so on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::error::TradeplotError;
use super::lenient;

pub const DEFAULT_INITIAL_CASH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    #[serde(deserialize_with = "lenient::timestamp_millis")]
    pub time: i64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquitySample {
    #[serde(deserialize_with = "lenient::timestamp_millis")]
    pub time: i64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub equity: f64,
}

/// One execution from the flat trade log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawTrade {
    #[serde(deserialize_with = "lenient::timestamp_millis")]
    pub time: i64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub qty: f64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_buy: bool,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub commission: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct BacktestResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_cash: Option<f64>,
    pub final_equity: f64,
    pub trades: Vec<RawTrade>,
    pub equity_curve: Vec<EquitySample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_data: Option<Vec<PriceSample>>,
}

impl BacktestResult {
    /// Initial cash as the summary sees it: absent means 100.
    pub fn initial_cash_or_default(&self) -> f64 {
        self.initial_cash.unwrap_or(DEFAULT_INITIAL_CASH)
    }

    pub fn from_json(text: &str) -> Result<Self, TradeplotError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| TradeplotError::decode("backtest result", e))?;
        Self::try_from(value).map_err(|e| TradeplotError::decode("backtest result", e))
    }
}

impl TryFrom<Value> for BacktestResult {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(obj) = value else {
            return Err(format!("expected a JSON object, got {value}"));
        };

        let initial_cash = match obj.get("initial_cash") {
            None | Some(Value::Null) => None,
            Some(v) => Some(lenient::to_number(v)),
        };
        let final_equity = obj
            .get("final_equity")
            .map(lenient::to_number)
            .unwrap_or(f64::NAN);

        let trades = decode_section::<RawTrade>(&obj, "trades").unwrap_or_default();
        let equity_curve = decode_section::<EquitySample>(&obj, "equity_curve").unwrap_or_default();
        let price_data = decode_section::<PriceSample>(&obj, "price_data");

        Ok(BacktestResult {
            initial_cash,
            final_equity,
            trades,
            equity_curve,
            price_data,
        })
    }
}

/// Decode one array section; `None` when absent, null or malformed.
fn decode_section<T>(obj: &Map<String, Value>, key: &str) -> Option<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => match Vec::<T>::deserialize(v) {
            Ok(items) => Some(items),
            Err(e) => {
                warn!(section = key, error = %e, "malformed section, rendering it empty");
                None
            }
        },
    }
}

/// Entry of the hours listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourInfo {
    pub hour: String,
    pub count: u64,
}

/// Body of a backtest submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub strategy: String,
    pub initial_cash: f64,
    pub position_size: f64,
    /// Percent per execution, e.g. `0.05` for 0.05%.
    pub commission: f64,
    pub hour: String,
    pub strategy_params: BTreeMap<String, f64>,
}

impl BacktestRequest {
    pub const BOLLINGER: &'static str = "bollinger";

    pub fn bollinger(period: u32, std_dev: f64) -> Self {
        let mut strategy_params = BTreeMap::new();
        strategy_params.insert("period".to_string(), f64::from(period));
        strategy_params.insert("stdDev".to_string(), std_dev);
        BacktestRequest {
            strategy: Self::BOLLINGER.to_string(),
            strategy_params,
            ..Self::without_strategy_params()
        }
    }

    fn without_strategy_params() -> Self {
        BacktestRequest {
            strategy: Self::BOLLINGER.to_string(),
            initial_cash: DEFAULT_INITIAL_CASH,
            position_size: 50.0,
            commission: 0.05,
            hour: String::new(),
            strategy_params: BTreeMap::new(),
        }
    }
}

impl Default for BacktestRequest {
    fn default() -> Self {
        Self::bollinger(100, 1.0)
    }
}
