//! Turns one backtest result into everything the view draws.
//!
//! [`present`] is a pure function of its inputs: charts are returned as
//! configuration values and bound to a render target separately (see
//! [`crate::ports::render_port::ChartSlots`]).

use serde::Serialize;

use super::chart::{self, ChartConfig, MarkerIndices, DEFAULT_CHART_WIDTH};
use super::format;
use super::metrics::{Summary, TradeStats};
use super::payload::BacktestResult;
use super::round_trip::{self, RoundTripTrade};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentOptions {
    pub chart_width: u32,
}

impl Default for PresentOptions {
    fn default() -> Self {
        PresentOptions {
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub value: String,
    pub label: &'static str,
}

/// One line of the trade history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRow {
    pub entry_time: String,
    pub entry_price: String,
    pub exit_time: String,
    pub exit_price: String,
    pub side: &'static str,
    pub quantity: String,
    pub commission: String,
    pub profit_loss: String,
    /// Profit/loss is zero or better.
    pub positive: bool,
}

impl TradeRow {
    pub fn from_round_trip(rt: &RoundTripTrade) -> Self {
        TradeRow {
            entry_time: format::timestamp(rt.entry.time),
            entry_price: format::dollars(rt.entry.price, 2),
            exit_time: format::timestamp(rt.exit.time),
            exit_price: format::dollars(rt.exit.price, 2),
            side: rt.side.label(),
            quantity: format::fixed(rt.entry.qty, 4),
            commission: format::dollars(rt.commission(), 4),
            profit_loss: format::dollars(rt.profit_loss, 2),
            positive: rt.profit_loss >= 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub config: ChartConfig,
    pub markers: MarkerIndices,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub summary: Summary,
    pub stats: TradeStats,
    pub price_chart: Option<PriceChart>,
    pub equity_chart: Option<ChartConfig>,
    pub round_trips: Vec<RoundTripTrade>,
    pub rows: Vec<TradeRow>,
}

impl Presentation {
    pub fn metric_cards(&self) -> Vec<MetricCard> {
        let s = &self.summary;
        vec![
            MetricCard {
                value: format::dollars(s.final_equity, 2),
                label: "Final Equity",
            },
            MetricCard {
                value: s.trade_count.to_string(),
                label: "Number of Trades",
            },
            MetricCard {
                value: format::dollars(s.profit, 2),
                label: "Profit",
            },
            MetricCard {
                value: format::percent(s.profit_pct),
                label: "Profit Percentage",
            },
        ]
    }
}

pub fn present(result: &BacktestResult, options: PresentOptions) -> Presentation {
    let round_trips = round_trip::reconstruct(&result.trades);
    let initial_cash = result.initial_cash_or_default();

    let summary = Summary::compute(result.final_equity, initial_cash, &round_trips);
    let stats = TradeStats::compute(&round_trips);

    let price_chart = result
        .price_data
        .as_deref()
        .and_then(|samples| chart::price_chart(samples, &round_trips, options.chart_width))
        .map(|(config, markers)| PriceChart { config, markers });
    let equity_chart =
        chart::equity_chart(&result.equity_curve, initial_cash, options.chart_width);

    let rows = round_trips.iter().map(TradeRow::from_round_trip).collect();

    Presentation {
        summary,
        stats,
        price_chart,
        equity_chart,
        round_trips,
        rows,
    }
}
