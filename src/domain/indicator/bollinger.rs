//! Bollinger Bands.
//!
//! mid = rolling mean(close, window); band offset = k × rolling sample
//! standard deviation; width = (upper − lower) / mid. Width is undefined when
//! mid is undefined or zero.

use crate::domain::bar::Bar;
use crate::domain::indicator::rolling::{rolling_mean, rolling_stddev};

pub struct BollingerOutput {
    pub mid: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub width: Vec<Option<f64>>,
}

pub fn calc_bbands(bars: &[Bar], window: usize, k: f64) -> BollingerOutput {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mid = rolling_mean(&closes, window);
    let stddev = rolling_stddev(&closes, window);

    let mut upper = Vec::with_capacity(bars.len());
    let mut lower = Vec::with_capacity(bars.len());
    let mut width = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        match (mid[i], stddev[i]) {
            (Some(m), Some(s)) => {
                let u = m + k * s;
                let l = m - k * s;
                upper.push(Some(u));
                lower.push(Some(l));
                width.push(if m != 0.0 { Some((u - l) / m) } else { None });
            }
            _ => {
                upper.push(None);
                lower.push(None);
                width.push(None);
            }
        }
    }

    BollingerOutput {
        mid,
        upper,
        lower,
        width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::testutil::make_bars;
    use approx::assert_relative_eq;

    #[test]
    fn bbands_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let out = calc_bbands(&bars, 3, 2.0);
        assert_eq!(out.mid[1], None);
        assert_eq!(out.upper[1], None);
        assert!(out.mid[2].is_some());
        assert!(out.width[3].is_some());
    }

    #[test]
    fn bbands_constant_series_zero_width() {
        let bars = make_bars(&[100.0; 6]);
        let out = calc_bbands(&bars, 3, 2.0);
        assert_relative_eq!(out.mid[5].unwrap(), 100.0);
        assert_relative_eq!(out.upper[5].unwrap(), 100.0);
        assert_relative_eq!(out.lower[5].unwrap(), 100.0);
        assert_relative_eq!(out.width[5].unwrap(), 0.0);
    }

    #[test]
    fn bbands_sample_stddev() {
        // [10,20,30]: mean 20, sample stddev 10 → upper 40, lower 0 with k=2.
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let out = calc_bbands(&bars, 3, 2.0);
        assert_relative_eq!(out.mid[2].unwrap(), 20.0);
        assert_relative_eq!(out.upper[2].unwrap(), 40.0);
        assert_relative_eq!(out.lower[2].unwrap(), 0.0);
        assert_relative_eq!(out.width[2].unwrap(), 40.0 / 20.0);
    }

    #[test]
    fn bbands_symmetric_around_mid() {
        let bars = make_bars(&[10.0, 25.0, 30.0, 12.0, 41.0]);
        let out = calc_bbands(&bars, 3, 2.0);
        for i in 2..5 {
            let (u, m, l) = (
                out.upper[i].unwrap(),
                out.mid[i].unwrap(),
                out.lower[i].unwrap(),
            );
            assert_relative_eq!(u - m, m - l, max_relative = 1e-12);
        }
    }

    #[test]
    fn bbands_zero_mid_width_undefined() {
        let bars = make_bars(&[-10.0, 0.0, 10.0]);
        let out = calc_bbands(&bars, 3, 2.0);
        assert!(out.upper[2].is_some());
        assert_eq!(out.width[2], None);
    }
}
