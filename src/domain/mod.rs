//! Core domain types and logic.

pub mod bar;
pub mod indicator;
pub mod signal;
pub mod backtest;
pub mod recommend;
pub mod error;
