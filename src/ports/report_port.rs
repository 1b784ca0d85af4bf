//! Report generation port trait.

use crate::domain::error::TradeplotError;
use crate::domain::presenter::Presentation;

/// Port for writing a presented backtest to disk.
pub trait ReportPort {
    fn write(&self, presentation: &Presentation, output_path: &str) -> Result<(), TradeplotError>;
}
