//! Backtest service over HTTP.
//!
//! Transport failures are returned once and never retried; the caller turns
//! them into a status line.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::{debug, info};

use crate::domain::error::TradeplotError;
use crate::domain::payload::{BacktestRequest, BacktestResult, HourInfo};
use crate::ports::backtest_port::BacktestPort;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const HOURS_PATH: &str = "/api/hours";
const BACKTEST_PATH: &str = "/api/backtest";

pub struct HttpBacktestAdapter {
    client: Client,
    base_url: String,
}

impl HttpBacktestAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TradeplotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TradeplotError::transport(base_url, e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradeplotError> {
        let base_url = config
            .get_string("server", "base_url")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = config.get_int("server", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64);
        if timeout_secs <= 0 {
            return Err(TradeplotError::ConfigInvalid {
                section: "server".into(),
                key: "timeout_secs".into(),
                reason: "must be positive".into(),
            });
        }
        Self::new(base_url.trim(), Duration::from_secs(timeout_secs as u64))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the body of a successful response; error statuses become
    /// transport errors carrying the server's message.
    fn body(endpoint: &str, response: Response) -> Result<String, TradeplotError> {
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TradeplotError::transport(endpoint, e))?;
        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(body);
            return Err(TradeplotError::transport(
                endpoint,
                format!("status {status}: {message}"),
            ));
        }
        Ok(body)
    }
}

impl BacktestPort for HttpBacktestAdapter {
    fn list_hours(&self) -> Result<Vec<HourInfo>, TradeplotError> {
        let url = self.url(HOURS_PATH);
        debug!(%url, "fetching hours");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| TradeplotError::transport(HOURS_PATH, e))?;
        let body = Self::body(HOURS_PATH, response)?;
        serde_json::from_str(&body).map_err(|e| TradeplotError::decode("hours listing", e))
    }

    fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, TradeplotError> {
        let url = self.url(BACKTEST_PATH);
        info!(%url, strategy = %request.strategy, hour = %request.hour, "submitting backtest");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| TradeplotError::transport(BACKTEST_PATH, e))?;
        let body = Self::body(BACKTEST_PATH, response)?;
        BacktestResult::from_json(&body)
    }
}
