//! CSV export of the trade history table.
//!
//! One record per round trip with raw numbers rather than the display
//! strings, so the file loads cleanly into a spreadsheet.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::error::TradeplotError;
use crate::domain::format;
use crate::domain::presenter::Presentation;
use crate::domain::round_trip::RoundTripTrade;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct TradeRecord<'a> {
    entry_time: String,
    entry_price: f64,
    exit_time: String,
    exit_price: f64,
    side: &'a str,
    quantity: f64,
    commission: f64,
    profit_loss: f64,
}

impl From<&RoundTripTrade> for TradeRecord<'static> {
    fn from(rt: &RoundTripTrade) -> Self {
        TradeRecord {
            entry_time: format::timestamp(rt.entry.time),
            entry_price: rt.entry.price,
            exit_time: format::timestamp(rt.exit.time),
            exit_price: rt.exit.price,
            side: rt.side.label(),
            quantity: rt.entry.qty,
            commission: rt.commission(),
            profit_loss: rt.profit_loss,
        }
    }
}

pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn to_writer<W: std::io::Write>(
        &self,
        presentation: &Presentation,
        writer: W,
    ) -> Result<(), TradeplotError> {
        let mut wtr = csv::Writer::from_writer(writer);
        if presentation.round_trips.is_empty() {
            wtr.write_record([
                "entry_time",
                "entry_price",
                "exit_time",
                "exit_price",
                "side",
                "quantity",
                "commission",
                "profit_loss",
            ])
            .map_err(|e| TradeplotError::render(format!("CSV write error: {e}")))?;
        }
        for rt in &presentation.round_trips {
            wtr.serialize(TradeRecord::from(rt))
                .map_err(|e| TradeplotError::render(format!("CSV write error: {e}")))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvAdapter {
    fn write(&self, presentation: &Presentation, output_path: &str) -> Result<(), TradeplotError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        self.to_writer(presentation, file)
    }
}
