//! Simple moving average of close.

use crate::domain::bar::Bar;
use crate::domain::indicator::rolling::rolling_mean;

/// Trailing mean of close over `window` bars; undefined for the first
/// `window − 1` bars.
pub fn calc_ma(bars: &[Bar], window: usize) -> Vec<Option<f64>> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    rolling_mean(&closes, window)
}
