//! ATR (Average True Range).
//!
//! Plain rolling mean of True Range over `window` bars (no Wilder smoothing).
//! The first bar has no previous close, so its True Range is high − low.

use crate::domain::bar::Bar;
use crate::domain::indicator::rolling::rolling_mean;

pub fn calc_atr(bars: &[Bar], window: usize) -> Vec<Option<f64>> {
    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();
    rolling_mean(&tr, window)
}
