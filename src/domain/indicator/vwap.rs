//! VWAP (volume-weighted average price).
//!
//! Cumulative (typical price × volume) / cumulative volume. The series model
//! is daily session bars with unique dates, so the intraday per-day reset
//! degenerates to a single running VWAP over the whole series. A zero-volume
//! bar has no defined VWAP for that row; accumulation continues past it.

use crate::domain::bar::Bar;

pub fn calc_vwap(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut cum_tpv = 0.0_f64;
    let mut cum_vol = 0.0_f64;
    bars.iter()
        .map(|bar| {
            let volume = bar.volume as f64;
            cum_tpv += bar.typical_price() * volume;
            cum_vol += volume;
            if bar.volume > 0 && cum_vol > 0.0 {
                Some(cum_tpv / cum_vol)
            } else {
                None
            }
        })
        .collect()
}
