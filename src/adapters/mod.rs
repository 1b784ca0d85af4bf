//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod html_report_adapter;
pub mod http_backtest_adapter;
pub mod json_file_adapter;
pub mod uplot_canvas;
