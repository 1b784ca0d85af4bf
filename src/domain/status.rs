//! The one-line status shown next to the results.

use std::fmt;

use super::error::TradeplotError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    HoursLoaded(usize),
    HoursFailed(String),
    Running,
    Completed,
    BacktestFailed(String),
}

impl Status {
    pub fn hours_failed(err: &TradeplotError) -> Self {
        Status::HoursFailed(transport_reason(err))
    }

    pub fn backtest_failed(err: &TradeplotError) -> Self {
        Status::BacktestFailed(transport_reason(err))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::HoursFailed(_) | Status::BacktestFailed(_))
    }
}

fn transport_reason(err: &TradeplotError) -> String {
    match err {
        TradeplotError::Transport { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(f, "Ready"),
            Status::HoursLoaded(n) => write!(f, "Found {n} hours of data"),
            Status::HoursFailed(reason) => write!(f, "Error loading hours: {reason}"),
            Status::Running => write!(f, "Running backtest..."),
            Status::Completed => write!(f, "Backtest completed"),
            Status::BacktestFailed(reason) => write!(f, "Error running backtest: {reason}"),
        }
    }
}
