//! Backtest port backed by a saved result payload on disk.
//!
//! Lets a previously fetched run be re-rendered without the service.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::error::TradeplotError;
use crate::domain::hours::hours_from_prices;
use crate::domain::payload::{BacktestRequest, BacktestResult, HourInfo};
use crate::ports::backtest_port::BacktestPort;

pub struct JsonFileAdapter {
    path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<BacktestResult, TradeplotError> {
        debug!(path = %self.path.display(), "reading saved backtest result");
        let text = fs::read_to_string(&self.path)?;
        BacktestResult::from_json(&text)
    }

    pub fn save(result: &BacktestResult, path: &Path) -> Result<(), TradeplotError> {
        let text = serde_json::to_string_pretty(result)
            .map_err(|e| TradeplotError::decode("backtest result", e))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        Ok(())
    }
}

impl BacktestPort for JsonFileAdapter {
    /// Hours come from the saved price samples.
    fn list_hours(&self) -> Result<Vec<HourInfo>, TradeplotError> {
        let result = self.load()?;
        Ok(hours_from_prices(result.price_data.as_deref().unwrap_or_default()))
    }

    /// The saved payload is returned whatever the request asks for.
    fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, TradeplotError> {
        debug!(hour = %request.hour, "replaying saved result");
        self.load()
    }
}
