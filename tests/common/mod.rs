#![allow(dead_code)]

use std::cell::RefCell;

use tradeplot::domain::error::TradeplotError;
use tradeplot::domain::payload::{
    BacktestRequest, BacktestResult, EquitySample, HourInfo, PriceSample, RawTrade,
};
use tradeplot::ports::backtest_port::BacktestPort;

/// Backtest port answering from canned data and recording every request.
pub struct MockBacktestPort {
    pub hours: Vec<HourInfo>,
    pub result: Option<BacktestResult>,
    pub error: Option<String>,
    pub requests: RefCell<Vec<BacktestRequest>>,
}

impl MockBacktestPort {
    pub fn new() -> Self {
        Self {
            hours: Vec::new(),
            result: None,
            error: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_hours(mut self, hours: &[(&str, u64)]) -> Self {
        self.hours = hours
            .iter()
            .map(|&(hour, count)| HourInfo {
                hour: hour.to_string(),
                count,
            })
            .collect();
        self
    }

    pub fn with_result(mut self, result: BacktestResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl BacktestPort for MockBacktestPort {
    fn list_hours(&self) -> Result<Vec<HourInfo>, TradeplotError> {
        if let Some(reason) = &self.error {
            return Err(TradeplotError::transport("/api/hours", reason));
        }
        Ok(self.hours.clone())
    }

    fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, TradeplotError> {
        self.requests.borrow_mut().push(request.clone());
        if let Some(reason) = &self.error {
            return Err(TradeplotError::transport("/api/backtest", reason));
        }
        self.result
            .clone()
            .ok_or_else(|| TradeplotError::decode("backtest result", "empty body"))
    }
}

pub fn trade(time: i64, price: f64, qty: f64, is_buy: bool, commission: f64) -> RawTrade {
    RawTrade {
        time,
        price,
        qty,
        is_buy,
        commission,
    }
}

pub fn equity(points: &[(i64, f64)]) -> Vec<EquitySample> {
    points
        .iter()
        .map(|&(time, equity)| EquitySample { time, equity })
        .collect()
}

pub fn prices(points: &[(i64, f64)]) -> Vec<PriceSample> {
    points
        .iter()
        .map(|&(time, price)| PriceSample { time, price })
        .collect()
}

/// One long round trip: buy at 100, sell at 110 a minute later.
pub fn long_scenario() -> BacktestResult {
    BacktestResult {
        initial_cash: Some(100.0),
        final_equity: 110.0,
        trades: vec![
            trade(0, 100.0, 1.0, true, 0.1),
            trade(60_000, 110.0, 1.0, false, 0.1),
        ],
        equity_curve: equity(&[(0, 100.0), (30_000, 104.0), (60_000, 110.0)]),
        price_data: Some(prices(&[(0, 100.0), (30_000, 105.0), (60_000, 110.0)])),
    }
}

pub const LONG_SCENARIO_JSON: &str = r#"{
    "initial_cash": 100,
    "final_equity": 110,
    "trades": [
        {"time": 0, "price": 100, "qty": 1, "is_buy": true, "commission": 0.1},
        {"time": 60000, "price": 110, "qty": 1, "is_buy": false, "commission": 0.1}
    ],
    "equity_curve": [
        {"time": 0, "equity": 100},
        {"time": 30000, "equity": 104},
        {"time": 60000, "equity": 110}
    ],
    "price_data": [
        {"time": 0, "price": 100},
        {"time": 30000, "price": 105},
        {"time": 60000, "price": 110}
    ]
}"#;
