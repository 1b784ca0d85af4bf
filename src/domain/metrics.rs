//! Summary metrics for one backtest result.

use super::round_trip::RoundTripTrade;

/// Headline numbers shown above the charts.
///
/// `initial_cash == 0` gives infinite or `NaN` percentages; they are reported
/// as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub initial_cash: f64,
    pub final_equity: f64,
    pub profit: f64,
    pub profit_pct: f64,
    pub trade_count: usize,
}

impl Summary {
    pub fn compute(final_equity: f64, initial_cash: f64, round_trips: &[RoundTripTrade]) -> Self {
        let profit = final_equity - initial_cash;
        Summary {
            initial_cash,
            final_equity,
            profit,
            profit_pct: profit / initial_cash * 100.0,
            trade_count: round_trips.len(),
        }
    }
}

/// Win/loss breakdown over completed round trips.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub gross_pnl: f64,
    pub net_pnl: f64,
    pub total_commission: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl TradeStats {
    pub fn compute(round_trips: &[RoundTripTrade]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut net_pnl = 0.0_f64;
        let mut total_commission = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for rt in round_trips {
            let pnl = rt.profit_loss;
            if pnl > 0.0 {
                trades_won += 1;
                if pnl > largest_win {
                    largest_win = pnl;
                }
            } else if pnl < 0.0 {
                trades_lost += 1;
                if pnl.abs() > largest_loss {
                    largest_loss = pnl.abs();
                }
            } else {
                trades_breakeven += 1;
            }
            net_pnl += pnl;
            total_commission += rt.commission();
        }

        let win_rate = if round_trips.is_empty() {
            0.0
        } else {
            trades_won as f64 / round_trips.len() as f64
        };

        TradeStats {
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            gross_pnl: net_pnl + total_commission,
            net_pnl,
            total_commission,
            largest_win,
            largest_loss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::RawTrade;
    use crate::domain::round_trip::reconstruct;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn trade(price: f64, is_buy: bool, commission: f64) -> RawTrade {
        RawTrade {
            time: 0,
            price,
            qty: 1.0,
            is_buy,
            commission,
        }
    }

    #[test]
    fn profit_and_percentage() {
        let round_trips = reconstruct(&[trade(100.0, true, 0.1), trade(110.0, false, 0.1)]);
        let summary = Summary::compute(110.0, 100.0, &round_trips);

        assert_eq!(summary.profit, 10.0);
        assert_eq!(summary.profit_pct, 10.0);
        assert_eq!(summary.trade_count, 1);
    }

    #[test]
    fn loss_is_negative() {
        let summary = Summary::compute(80.0, 100.0, &[]);
        assert_eq!(summary.profit, -20.0);
        assert_eq!(summary.profit_pct, -20.0);
        assert_eq!(summary.trade_count, 0);
    }

    #[test]
    fn zero_initial_cash_is_not_guarded() {
        let gain = Summary::compute(10.0, 0.0, &[]);
        assert!(gain.profit_pct.is_infinite() && gain.profit_pct > 0.0);

        let flat = Summary::compute(0.0, 0.0, &[]);
        assert!(flat.profit_pct.is_nan());
    }

    #[test]
    fn nan_equity_propagates() {
        let summary = Summary::compute(f64::NAN, 100.0, &[]);
        assert!(summary.profit.is_nan());
        assert!(summary.profit_pct.is_nan());
    }

    #[test]
    fn trade_count_ignores_open_entry() {
        let round_trips = reconstruct(&[
            trade(100.0, true, 0.0),
            trade(101.0, false, 0.0),
            trade(102.0, true, 0.0),
        ]);
        assert_eq!(Summary::compute(100.0, 100.0, &round_trips).trade_count, 1);
    }

    #[test]
    fn stats_split_wins_losses_and_breakeven() {
        let round_trips = reconstruct(&[
            trade(100.0, true, 0.0),
            trade(110.0, false, 0.0),
            trade(100.0, true, 0.0),
            trade(95.0, false, 0.0),
            trade(50.0, false, 0.0),
            trade(50.0, true, 0.0),
            trade(20.0, false, 0.0),
            trade(10.0, true, 0.0),
        ]);
        let stats = TradeStats::compute(&round_trips);

        assert_eq!(stats.trades_won, 2);
        assert_eq!(stats.trades_lost, 1);
        assert_eq!(stats.trades_breakeven, 1);
        assert_relative_eq!(stats.win_rate, 0.5);
        assert_relative_eq!(stats.largest_win, 10.0);
        assert_relative_eq!(stats.largest_loss, 5.0);
        assert_relative_eq!(stats.net_pnl, 15.0);
    }

    #[test]
    fn stats_track_commission() {
        let round_trips = reconstruct(&[trade(100.0, true, 0.25), trade(110.0, false, 0.25)]);
        let stats = TradeStats::compute(&round_trips);

        assert_relative_eq!(stats.total_commission, 0.5);
        assert_relative_eq!(stats.net_pnl, 9.5);
        assert_relative_eq!(stats.gross_pnl, 10.0);
    }

    #[test]
    fn stats_empty() {
        let stats = TradeStats::compute(&[]);
        assert_eq!(stats.trades_won, 0);
        assert_relative_eq!(stats.win_rate, 0.0);
        assert_relative_eq!(stats.net_pnl, 0.0);
    }

    proptest! {
        #[test]
        fn profit_is_exact_difference(final_equity in -1e6f64..1e6, initial in 0.01f64..1e6) {
            let summary = Summary::compute(final_equity, initial, &[]);
            prop_assert_eq!(summary.profit, final_equity - initial);
            prop_assert_eq!(summary.profit_pct, (final_equity - initial) / initial * 100.0);
        }
    }
}
