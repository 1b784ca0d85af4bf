//! Port traits: the seams between the presentation core and the outside.

pub mod backtest_port;
pub mod config_port;
pub mod render_port;
pub mod report_port;
