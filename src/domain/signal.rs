//! Trading signal generation.
//!
//! Two strategies, both pure functions of a bar series: a moving-average
//! crossover and a weighted composite score. Each computes the indicators it
//! needs itself, so the simulator only ever sees one augmented series per run.
//! A rule whose indicator is still undefined contributes nothing — it never
//! errors.

use crate::domain::bar::BarSeries;
use crate::domain::indicator::{
    compute_indicators, rolling::rolling_mean_opt, AugmentedSeries, Column, IndicatorKind,
    IndicatorParams,
};

/// Per-bar trading stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Long,
    Flat,
    Short,
}

impl Signal {
    /// Position multiplier: +1 / 0 / −1.
    pub fn value(&self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Flat => 0.0,
            Signal::Short => -1.0,
        }
    }
}

/// Weights for the composite score's independent rules. Long and short
/// contributions are symmetric except for the width-expansion rule, which has
/// no short side.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeWeights {
    pub vol_breakout: f64,
    pub ma_alignment: f64,
    pub macd_momentum: f64,
    pub rsi_momentum: f64,
    pub bb_width_expansion: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        CompositeWeights {
            vol_breakout: 1.0,
            ma_alignment: 1.0,
            macd_momentum: 0.75,
            rsi_momentum: 0.5,
            bb_width_expansion: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeParams {
    pub ma_short: usize,
    pub ma_mid: usize,
    pub ma_long: usize,
    pub weights: CompositeWeights,
    pub indicators: IndicatorParams,
}

impl Default for CompositeParams {
    fn default() -> Self {
        CompositeParams {
            ma_short: 5,
            ma_mid: 20,
            ma_long: 60,
            weights: CompositeWeights::default(),
            indicators: IndicatorParams::default(),
        }
    }
}

/// Score at or beyond this magnitude flips the composite signal off Flat.
pub const COMPOSITE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    MaCrossover {
        short_window: usize,
        long_window: usize,
    },
    Composite(CompositeParams),
}

impl Strategy {
    /// Derive one signal per bar, returning the augmented series the strategy
    /// computed along the way.
    pub fn signals(&self, series: &BarSeries) -> (AugmentedSeries, Vec<Signal>) {
        match self {
            Strategy::MaCrossover {
                short_window,
                long_window,
            } => crossover_signals(series, *short_window, *long_window),
            Strategy::Composite(params) => composite_signals(series, params),
        }
    }
}

fn crossover_signals(
    series: &BarSeries,
    short_window: usize,
    long_window: usize,
) -> (AugmentedSeries, Vec<Signal>) {
    let frame = compute_indicators(
        series,
        &[
            IndicatorKind::Ma(short_window),
            IndicatorKind::Ma(long_window),
        ],
        &IndicatorParams::default(),
    );

    let signals = (0..frame.len())
        .map(|i| {
            match (
                frame.value(Column::Ma(short_window), i),
                frame.value(Column::Ma(long_window), i),
            ) {
                (Some(short), Some(long)) if short > long => Signal::Long,
                (Some(short), Some(long)) if short < long => Signal::Short,
                _ => Signal::Flat,
            }
        })
        .collect();

    (frame, signals)
}

fn composite_signals(series: &BarSeries, params: &CompositeParams) -> (AugmentedSeries, Vec<Signal>) {
    let kinds = [
        IndicatorKind::Ma(params.ma_short),
        IndicatorKind::Ma(params.ma_mid),
        IndicatorKind::Ma(params.ma_long),
        IndicatorKind::Rsi,
        IndicatorKind::Atr,
        IndicatorKind::Bbands,
        IndicatorKind::Macd,
        IndicatorKind::Vwap,
        IndicatorKind::VolumeSpike,
    ];
    let frame = compute_indicators(series, &kinds, &params.indicators);
    let weights = &params.weights;

    // Width-expansion compares the current band width to its own rolling mean.
    let width_mean = frame
        .column(Column::BbWidth)
        .map(|width| rolling_mean_opt(width, params.indicators.bb_window))
        .unwrap_or_default();

    let signals = (0..frame.len())
        .map(|i| {
            let mut score = 0.0_f64;
            let close = frame.bars()[i].close;

            // Volume breakout through a Bollinger band.
            if frame.spike_at(i) {
                if let Some(upper) = frame.value(Column::BbUpper, i) {
                    if close > upper {
                        score += weights.vol_breakout;
                    }
                }
                if let Some(lower) = frame.value(Column::BbLower, i) {
                    if close < lower {
                        score -= weights.vol_breakout;
                    }
                }
            }

            // Strict MA ordering, bullish or bearish.
            if let (Some(s), Some(m), Some(l)) = (
                frame.value(Column::Ma(params.ma_short), i),
                frame.value(Column::Ma(params.ma_mid), i),
                frame.value(Column::Ma(params.ma_long), i),
            ) {
                if s > m && m > l {
                    score += weights.ma_alignment;
                } else if s < m && m < l {
                    score -= weights.ma_alignment;
                }
            }

            // Momentum rules look one bar back only.
            if i > 0 {
                if let (Some(hist), Some(prev)) = (
                    frame.value(Column::MacdHist, i),
                    frame.value(Column::MacdHist, i - 1),
                ) {
                    if hist > 0.0 && hist > prev {
                        score += weights.macd_momentum;
                    } else if hist < 0.0 && hist < prev {
                        score -= weights.macd_momentum;
                    }
                }

                if let (Some(rsi), Some(prev)) = (
                    frame.value(Column::Rsi, i),
                    frame.value(Column::Rsi, i - 1),
                ) {
                    if rsi > 50.0 && rsi > prev {
                        score += weights.rsi_momentum;
                    } else if rsi < 50.0 && rsi < prev {
                        score -= weights.rsi_momentum;
                    }
                }
            }

            if let (Some(width), Some(&Some(mean))) =
                (frame.value(Column::BbWidth, i), width_mean.get(i))
            {
                if width > mean {
                    score += weights.bb_width_expansion;
                }
            }

            if score >= COMPOSITE_THRESHOLD {
                Signal::Long
            } else if score <= -COMPOSITE_THRESHOLD {
                Signal::Short
            } else {
                Signal::Flat
            }
        })
        .collect();

    (frame, signals)
}
