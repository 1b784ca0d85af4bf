//! Backtest service port: the hours listing and backtest submission.

use crate::domain::error::TradeplotError;
use crate::domain::payload::{BacktestRequest, BacktestResult, HourInfo};

pub trait BacktestPort {
    fn list_hours(&self) -> Result<Vec<HourInfo>, TradeplotError>;

    fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, TradeplotError>;
}
