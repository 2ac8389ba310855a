//! Volume-spike flag: volume > factor × rolling mean(volume, window).
//!
//! An undefined rolling mean reads as "no spike" (false), not undefined.

use crate::domain::bar::Bar;
use crate::domain::indicator::rolling::rolling_mean;

pub fn calc_volume_spike(bars: &[Bar], window: usize, factor: f64) -> Vec<bool> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
    let avg = rolling_mean(&volumes, window);
    bars.iter()
        .zip(avg.iter())
        .map(|(bar, mean)| match mean {
            Some(m) => bar.volume as f64 > factor * m,
            None => false,
        })
        .collect()
}
