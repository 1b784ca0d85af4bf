//! End-to-end presentation of decoded backtest payloads.

mod common;

use approx::assert_relative_eq;
use common::*;
use tradeplot::domain::chart::CHART_HEIGHT;
use tradeplot::domain::payload::BacktestResult;
use tradeplot::domain::presenter::{present, PresentOptions};
use tradeplot::domain::round_trip::Side;

mod scenarios {
    use super::*;

    #[test]
    fn single_long_round_trip() {
        let result = BacktestResult::from_json(LONG_SCENARIO_JSON).unwrap();
        let p = present(&result, PresentOptions::default());

        assert_eq!(p.summary.profit, 10.0);
        assert_eq!(p.summary.profit_pct, 10.0);
        assert_eq!(p.summary.trade_count, 1);
        assert_eq!(p.round_trips.len(), 1);
        assert_eq!(p.round_trips[0].side, Side::Long);
        assert_relative_eq!(p.round_trips[0].profit_loss, 9.8, epsilon = 1e-12);

        let row = &p.rows[0];
        assert_eq!(row.side, "LONG");
        assert_eq!(row.profit_loss, "$9.80");
        assert!(row.positive);
    }

    #[test]
    fn empty_trades_with_equity_curve() {
        let result = BacktestResult::from_json(
            r#"{"initial_cash": 100, "final_equity": 100, "trades": [],
                "equity_curve": [{"time": 0, "equity": 100}, {"time": 1000, "equity": 100}]}"#,
        )
        .unwrap();
        let p = present(&result, PresentOptions::default());

        assert!(p.rows.is_empty());
        assert_eq!(p.summary.trade_count, 0);
        assert!(p.price_chart.is_none());
        let equity = p.equity_chart.expect("equity chart is rendered");
        assert_eq!(equity.data.x, vec![0.0, 1.0]);
    }

    #[test]
    fn omitted_initial_cash_is_one_hundred() {
        let result =
            BacktestResult::from_json(r#"{"final_equity": 150, "trades": [], "equity_curve": []}"#)
                .unwrap();
        let p = present(&result, PresentOptions::default());

        assert_eq!(p.summary.initial_cash, 100.0);
        assert_eq!(p.summary.profit, 50.0);
        assert_eq!(p.summary.profit_pct, 50.0);
    }

    #[test]
    fn null_initial_cash_is_one_hundred() {
        let result = BacktestResult::from_json(
            r#"{"initial_cash": null, "final_equity": 90, "trades": [], "equity_curve": []}"#,
        )
        .unwrap();
        let p = present(&result, PresentOptions::default());
        assert_eq!(p.summary.profit, -10.0);
    }

    #[test]
    fn zero_initial_cash_propagates_infinity() {
        let result = BacktestResult::from_json(
            r#"{"initial_cash": 0, "final_equity": 10, "trades": [], "equity_curve": []}"#,
        )
        .unwrap();
        let p = present(&result, PresentOptions::default());

        assert_eq!(p.summary.profit_pct, f64::INFINITY);
        assert_eq!(p.metric_cards()[3].value, "Infinity%");
    }

    #[test]
    fn presenting_twice_is_identical() {
        let result = long_scenario();
        let first = present(&result, PresentOptions::default());
        let second = present(&result, PresentOptions::default());

        assert_eq!(first.rows, second.rows);
        assert_eq!(first.metric_cards(), second.metric_cards());
        assert_eq!(first, second);
    }
}

mod malformed_payloads {
    use super::*;

    #[test]
    fn malformed_trades_leave_the_rest_intact() {
        let result = BacktestResult::from_json(
            r#"{"final_equity": 105, "trades": "oops",
                "equity_curve": [{"time": 0, "equity": 100}],
                "price_data": [{"time": 0, "price": 1.5}]}"#,
        )
        .unwrap();
        let p = present(&result, PresentOptions::default());

        assert!(p.rows.is_empty());
        assert!(p.equity_chart.is_some());
        assert!(p.price_chart.is_some());
    }

    #[test]
    fn missing_final_equity_shows_nan() {
        let result = BacktestResult::from_json(r#"{"trades": [], "equity_curve": []}"#).unwrap();
        let p = present(&result, PresentOptions::default());

        assert!(p.summary.profit.is_nan());
        assert_eq!(p.metric_cards()[0].value, "$NaN");
        assert!(p.equity_chart.is_none());
    }

    #[test]
    fn rfc3339_trade_times() {
        let result = BacktestResult::from_json(
            r#"{"final_equity": 100, "equity_curve": [], "trades": [
                {"time": "2024-03-01T14:00:00Z", "price": 10, "qty": 1, "is_buy": false, "commission": 0},
                {"time": "2024-03-01T14:05:30Z", "price": 9, "qty": 1, "is_buy": true, "commission": 0}
            ]}"#,
        )
        .unwrap();
        let p = present(&result, PresentOptions::default());

        assert_eq!(p.rows[0].entry_time, "2024-03-01 14:00:00");
        assert_eq!(p.rows[0].exit_time, "2024-03-01 14:05:30");
        assert_eq!(p.rows[0].side, "SHORT");
        assert_eq!(p.rows[0].profit_loss, "$1.00");
    }
}

mod charts {
    use super::*;

    #[test]
    fn price_chart_carries_trade_markers() {
        let p = present(&long_scenario(), PresentOptions::default());
        let chart = p.price_chart.expect("price chart");

        assert_eq!(chart.config.series_count(), 3);
        assert_eq!(chart.markers.buys, Some(2));
        assert_eq!(chart.markers.sells, Some(3));
        assert_eq!(chart.config.data.x, vec![0.0, 30.0, 60.0]);
        assert_eq!(
            chart.config.data.series(2).unwrap(),
            &[Some(100.0), None, None]
        );
        assert_eq!(
            chart.config.data.series(3).unwrap(),
            &[None, None, Some(110.0)]
        );
    }

    #[test]
    fn chart_width_follows_options() {
        let p = present(&long_scenario(), PresentOptions { chart_width: 640 });
        let equity = p.equity_chart.unwrap();
        assert_eq!(equity.width, 640);
        assert_eq!(equity.height, CHART_HEIGHT);
        assert_eq!(equity.title, "Equity Curve (Initial: $100)");
    }

    #[test]
    fn open_position_gets_no_marker() {
        let mut result = long_scenario();
        result.trades.push(trade(60_000, 110.0, 1.0, true, 0.1));
        let p = present(&result, PresentOptions::default());

        assert_eq!(p.summary.trade_count, 1);
        let chart = p.price_chart.unwrap();
        let buys = chart.config.data.series(2).unwrap();
        assert_eq!(buys.iter().flatten().count(), 1);
    }
}
