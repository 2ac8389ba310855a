//! Assembles an [`AugmentedSeries`] from a bar series and a set of requested
//! indicators.
//!
//! Pure: the caller's series is copied, never mutated. Too little history is
//! not an error here — affected columns simply stay undefined for their
//! warm-up span (or for the whole series).

use std::collections::BTreeSet;

use crate::domain::bar::BarSeries;
use crate::domain::indicator::{
    atr::calc_atr, bollinger::calc_bbands, ema::calc_ema, macd::calc_macd, rsi::calc_rsi,
    sma::calc_ma, volume_spike::calc_volume_spike, vwap::calc_vwap, AugmentedSeries, Column,
    IndicatorKind, IndicatorParams,
};

pub fn compute_indicators(
    series: &BarSeries,
    kinds: &[IndicatorKind],
    params: &IndicatorParams,
) -> AugmentedSeries {
    let mut frame = AugmentedSeries::new(series.bars().to_vec());
    let bars = series.bars();

    // Duplicate MA/EMA requests collapse to one column per window.
    let ma_windows: BTreeSet<usize> = kinds
        .iter()
        .filter_map(|k| match k {
            IndicatorKind::Ma(w) => Some(*w),
            _ => None,
        })
        .collect();
    let ema_spans: BTreeSet<usize> = kinds
        .iter()
        .filter_map(|k| match k {
            IndicatorKind::Ema(w) => Some(*w),
            _ => None,
        })
        .collect();

    for window in ma_windows {
        frame.insert(Column::Ma(window), calc_ma(bars, window));
    }
    for span in ema_spans {
        frame.insert(Column::Ema(span), calc_ema(bars, span));
    }

    if kinds.contains(&IndicatorKind::Rsi) {
        frame.insert(Column::Rsi, calc_rsi(bars, params.rsi_window));
    }
    if kinds.contains(&IndicatorKind::Atr) {
        frame.insert(Column::Atr, calc_atr(bars, params.atr_window));
    }
    if kinds.contains(&IndicatorKind::Bbands) {
        let bb = calc_bbands(bars, params.bb_window, params.bb_std);
        frame.insert(Column::BbMid, bb.mid);
        frame.insert(Column::BbUpper, bb.upper);
        frame.insert(Column::BbLower, bb.lower);
        frame.insert(Column::BbWidth, bb.width);
    }
    if kinds.contains(&IndicatorKind::Macd) {
        let macd = calc_macd(bars, params.macd_fast, params.macd_slow, params.macd_signal);
        frame.insert(Column::Macd, macd.macd);
        frame.insert(Column::MacdSignal, macd.signal);
        frame.insert(Column::MacdHist, macd.histogram);
    }
    if kinds.contains(&IndicatorKind::Vwap) {
        frame.insert(Column::Vwap, calc_vwap(bars));
    }
    if kinds.contains(&IndicatorKind::VolumeSpike) {
        frame.set_volume_spike(calc_volume_spike(bars, params.vol_window, params.vol_factor));
    }

    frame
}
