//! RSI (Relative Strength Index).
//!
//! Simple rolling means of positive/negative close-to-close deltas (not
//! Wilder's smoothing): RSI = 100 − 100/(1 + avg_gain/avg_loss).
//! When avg_loss is zero the value is undefined rather than clamped to 100.
//! The first delta needs a previous close, so the warm-up runs one bar past
//! the window: the first defined slot is index `window`.

use crate::domain::bar::Bar;
use crate::domain::indicator::rolling::rolling_mean_opt;

pub fn calc_rsi(bars: &[Bar], window: usize) -> Vec<Option<f64>> {
    let mut gains: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    let mut losses: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            gains.push(None);
            losses.push(None);
        } else {
            let delta = bar.close - bars[i - 1].close;
            gains.push(Some(delta.max(0.0)));
            losses.push(Some((-delta).max(0.0)));
        }
    }

    let avg_gain = rolling_mean_opt(&gains, window);
    let avg_loss = rolling_mean_opt(&losses, window);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(gain, loss)| match (gain, loss) {
            (Some(g), Some(l)) if *l > 0.0 => Some(100.0 - 100.0 / (1.0 + g / l)),
            _ => None,
        })
        .collect()
}
