//! Round-trip reconstruction from the flat trade log.
//!
//! The log alternates entry, exit, entry, exit. Element `2k` opens a position
//! and element `2k + 1` closes it. A trailing unmatched entry is a position
//! still open at the end of the run and is left out.

use serde::Serialize;

use super::payload::RawTrade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn of_entry(entry: &RawTrade) -> Self {
        if entry.is_buy { Side::Long } else { Side::Short }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundTripTrade {
    pub entry: RawTrade,
    pub exit: RawTrade,
    pub side: Side,
    pub profit_loss: f64,
}

impl RoundTripTrade {
    pub fn from_pair(entry: RawTrade, exit: RawTrade) -> Self {
        let side = Side::of_entry(&entry);
        let commission = entry.commission + exit.commission;
        let gross = match side {
            Side::Long => (exit.price - entry.price) * entry.qty,
            Side::Short => (entry.price - exit.price) * entry.qty,
        };
        RoundTripTrade {
            entry,
            exit,
            side,
            profit_loss: gross - commission,
        }
    }

    /// Commission paid on both legs.
    pub fn commission(&self) -> f64 {
        self.entry.commission + self.exit.commission
    }

    /// Profit/loss before commission.
    pub fn gross(&self) -> f64 {
        self.profit_loss + self.commission()
    }
}

/// Pair the log as (0,1), (2,3), ... dropping an odd trailing entry.
pub fn reconstruct(trades: &[RawTrade]) -> Vec<RoundTripTrade> {
    trades
        .chunks_exact(2)
        .map(|pair| RoundTripTrade::from_pair(pair[0], pair[1]))
        .collect()
}
