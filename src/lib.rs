//! tradeplot: backtest runner client and result viewer.
//!
//! Hexagonal architecture: presentation logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`], command-line entry in
//! [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
