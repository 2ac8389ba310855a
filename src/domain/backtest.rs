//! Backtest simulator.
//!
//! Replays a signal series bar-by-bar against the closes with unit-position
//! accounting: the signal level is the position size (one long unit, one
//! short unit), so a signal change of Δ moves cash by −Δ × close and the
//! holdings are worth signal × close. This deliberately preserves the
//! reference accounting rather than modelling share counts funded by capital.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::bar::BarSeries;
use crate::domain::error::ScoutError;
use crate::domain::signal::{Signal, Strategy};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Per-bar portfolio state; total == cash + holdings always.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub date: NaiveDate,
    pub cash: f64,
    pub holdings: f64,
    pub total: f64,
}

/// Bar-ordered portfolio states plus the per-bar simple returns (the first
/// bar's return is undefined, not zero).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioTrajectory {
    pub states: Vec<PortfolioState>,
    pub returns: Vec<Option<f64>>,
}

/// Summary statistics of one backtest run. Numeric fields only — formatting
/// is a presentation concern — so encoding to JSON and back is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub trades: usize,
    pub profitable_trades: usize,
    pub win_rate: f64,
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub final_value: f64,
    pub initial_capital: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub report: BacktestReport,
    pub trajectory: PortfolioTrajectory,
    pub signals: Vec<Signal>,
}

/// Apply `strategy` to the series and simulate the resulting signals.
pub fn run_backtest(
    series: &BarSeries,
    strategy: &Strategy,
    initial_capital: f64,
) -> Result<BacktestResult, ScoutError> {
    let (_frame, signals) = strategy.signals(series);
    simulate(series, &signals, initial_capital)
}

/// Replay a precomputed signal series. Fails only when the signal series does
/// not line up one-to-one with the bars; every arithmetic hazard inside
/// resolves to a defined sentinel instead.
pub fn simulate(
    series: &BarSeries,
    signals: &[Signal],
    initial_capital: f64,
) -> Result<BacktestResult, ScoutError> {
    if signals.len() != series.len() {
        return Err(ScoutError::StrategyOutput {
            expected: series.len(),
            actual: signals.len(),
        });
    }

    let bars = series.bars();
    let mut cash = initial_capital;
    let mut states: Vec<PortfolioState> = Vec::with_capacity(bars.len());
    let mut returns = Vec::with_capacity(bars.len());
    let mut changes = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let signal = signals[i].value();
        // The first signal is its own position change: no pre-existing
        // position is assumed.
        let change = if i == 0 {
            signal
        } else {
            signal - signals[i - 1].value()
        };
        changes.push(change);

        if change != 0.0 {
            cash -= change * bar.close;
        }
        let holdings = signal * bar.close;
        let total = cash + holdings;

        let ret = if i == 0 {
            None
        } else {
            let prev = states[i - 1].total;
            if prev != 0.0 {
                Some((total - prev) / prev)
            } else {
                None
            }
        };
        returns.push(ret);
        states.push(PortfolioState {
            date: bar.date,
            cash,
            holdings,
            total,
        });
    }

    let report = build_report(bars, &changes, &states, &returns, initial_capital);

    Ok(BacktestResult {
        report,
        trajectory: PortfolioTrajectory { states, returns },
        signals: signals.to_vec(),
    })
}

fn build_report(
    bars: &[crate::domain::bar::Bar],
    changes: &[f64],
    states: &[PortfolioState],
    returns: &[Option<f64>],
    initial_capital: f64,
) -> BacktestReport {
    let trades = changes.iter().filter(|&&c| c != 0.0).count();

    // A position opened at bar i is scored against the close of the next bar
    // that reduces exposure, or the final close if it never exits.
    let mut opened = 0usize;
    let mut profitable_trades = 0usize;
    if let Some(last_bar) = bars.last() {
        for (i, &change) in changes.iter().enumerate() {
            if change <= 0.0 {
                continue;
            }
            opened += 1;
            let exit_close = changes[i + 1..]
                .iter()
                .position(|&c| c < 0.0)
                .map(|offset| bars[i + 1 + offset].close)
                .unwrap_or(last_bar.close);
            if exit_close > bars[i].close {
                profitable_trades += 1;
            }
        }
    }
    let win_rate = if opened > 0 {
        profitable_trades as f64 / opened as f64 * 100.0
    } else {
        0.0
    };

    let final_value = states.last().map(|s| s.total).unwrap_or(initial_capital);
    let total_return_pct = if initial_capital != 0.0 {
        (final_value / initial_capital - 1.0) * 100.0
    } else {
        0.0
    };

    let sharpe_ratio = sharpe(returns);
    let max_drawdown_pct = max_drawdown(states) * 100.0;

    BacktestReport {
        trades,
        profitable_trades,
        win_rate,
        total_return_pct,
        sharpe_ratio,
        max_drawdown_pct,
        final_value,
        initial_capital,
    }
}

/// √252 × mean/stddev of the defined per-bar returns; 0 when the deviation is
/// zero or there are too few returns to estimate it.
fn sharpe(returns: &[Option<f64>]) -> f64 {
    let defined: Vec<f64> = returns.iter().flatten().copied().collect();
    if defined.len() < 2 {
        return 0.0;
    }
    let n = defined.len() as f64;
    let mean = defined.iter().sum::<f64>() / n;
    let variance = defined.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();
    if stddev > 0.0 {
        TRADING_DAYS_PER_YEAR.sqrt() * mean / stddev
    } else {
        0.0
    }
}

/// Peak-to-trough decline as a positive fraction of the running peak.
fn max_drawdown(states: &[PortfolioState]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for state in states {
        if state.total > peak {
            peak = state.total;
        }
        if peak > 0.0 {
            let dd = (peak - state.total) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}
