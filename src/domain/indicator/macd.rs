//! MACD (Moving Average Convergence/Divergence).
//!
//! MACD = EMA(fast) − EMA(slow); signal = EMA(signal) of the MACD values,
//! recursing over defined values only; histogram = MACD − signal.

use crate::domain::bar::Bar;
use crate::domain::indicator::ema::calc_ema;
use crate::domain::indicator::rolling::ewm;

pub struct MacdOutput {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn calc_macd(bars: &[Bar], fast: usize, slow: usize, signal_span: usize) -> MacdOutput {
    let ema_fast = calc_ema(bars, fast);
    let ema_slow = calc_ema(bars, slow);

    let macd: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let signal = ewm(&macd, signal_span);

    let histogram: Vec<Option<f64>> = macd
        .iter()
        .zip(signal.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdOutput {
        macd,
        signal,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::testutil::make_bars;
    use approx::assert_relative_eq;

    #[test]
    fn macd_warmup_follows_slow_ema() {
        let bars = make_bars(&(0..40).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let out = calc_macd(&bars, 12, 26, 9);
        // MACD defined once the slow EMA is (index slow−1); signal needs
        // `signal_span` MACD observations on top of that.
        assert_eq!(out.macd[24], None);
        assert!(out.macd[25].is_some());
        assert_eq!(out.signal[32], None);
        assert!(out.signal[33].is_some());
        assert!(out.histogram[33].is_some());
    }

    #[test]
    fn macd_constant_series_is_zero() {
        let bars = make_bars(&[100.0; 40]);
        let out = calc_macd(&bars, 12, 26, 9);
        assert_relative_eq!(out.macd[39].unwrap(), 0.0);
        assert_relative_eq!(out.signal[39].unwrap(), 0.0);
        assert_relative_eq!(out.histogram[39].unwrap(), 0.0);
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let bars = make_bars(&closes);
        let out = calc_macd(&bars, 12, 26, 9);
        assert!(out.macd[59].unwrap() > 0.0);
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..50)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        let bars = make_bars(&closes);
        let out = calc_macd(&bars, 5, 10, 4);
        for i in 0..50 {
            if let (Some(m), Some(s), Some(h)) = (out.macd[i], out.signal[i], out.histogram[i]) {
                assert_relative_eq!(h, m - s, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn macd_short_series_all_undefined() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let out = calc_macd(&bars, 12, 26, 9);
        assert!(out.macd.iter().all(Option::is_none));
        assert!(out.signal.iter().all(Option::is_none));
        assert!(out.histogram.iter().all(Option::is_none));
    }
}
