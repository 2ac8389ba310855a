//! stockscout — technical indicator engine, backtest simulator, and trade
//! recommendation scorer for daily OHLCV bar series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
