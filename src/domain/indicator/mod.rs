//! Technical indicator engine.
//!
//! [`IndicatorKind`] names what a caller can request (parsed from strings such
//! as `MA5` or `RSI`), [`Column`] names each output column of the augmented
//! series, and [`AugmentedSeries`] carries the input bars plus one
//! `Option<f64>` column per computed value. `None` means "not yet computed"
//! (warm-up) or an arithmetic sentinel, and is never confused with a real zero.

pub mod rolling;
pub mod sma;
pub mod ema;
pub mod rsi;
pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod vwap;
pub mod volume_spike;
pub mod engine;

pub use engine::compute_indicators;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::bar::Bar;
use crate::domain::error::ScoutError;

/// A requestable indicator, parameterized where the name carries a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Ma(usize),
    Ema(usize),
    Rsi,
    Atr,
    Bbands,
    Macd,
    Vwap,
    VolumeSpike,
}

impl FromStr for IndicatorKind {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "RSI" => return Ok(IndicatorKind::Rsi),
            "ATR" => return Ok(IndicatorKind::Atr),
            "BBANDS" => return Ok(IndicatorKind::Bbands),
            "MACD" => return Ok(IndicatorKind::Macd),
            "VWAP" => return Ok(IndicatorKind::Vwap),
            "VOLUMESPIKE" => return Ok(IndicatorKind::VolumeSpike),
            _ => {}
        }
        let window = |prefix: &str| -> Option<usize> {
            upper
                .strip_prefix(prefix)
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&w| w > 0)
        };
        if let Some(w) = window("EMA") {
            return Ok(IndicatorKind::Ema(w));
        }
        if let Some(w) = window("MA") {
            return Ok(IndicatorKind::Ma(w));
        }
        Err(ScoutError::UnknownIndicator {
            name: s.trim().to_string(),
        })
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Ma(w) => write!(f, "MA{}", w),
            IndicatorKind::Ema(w) => write!(f, "EMA{}", w),
            IndicatorKind::Rsi => write!(f, "RSI"),
            IndicatorKind::Atr => write!(f, "ATR"),
            IndicatorKind::Bbands => write!(f, "BBANDS"),
            IndicatorKind::Macd => write!(f, "MACD"),
            IndicatorKind::Vwap => write!(f, "VWAP"),
            IndicatorKind::VolumeSpike => write!(f, "VolumeSpike"),
        }
    }
}

/// One output column of the augmented series. A single requested indicator may
/// contribute several columns (Bollinger, MACD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Ma(usize),
    Ema(usize),
    Rsi,
    Atr,
    BbMid,
    BbUpper,
    BbLower,
    BbWidth,
    Macd,
    MacdSignal,
    MacdHist,
    Vwap,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Ma(w) => write!(f, "MA{}", w),
            Column::Ema(w) => write!(f, "EMA{}", w),
            Column::Rsi => write!(f, "RSI"),
            Column::Atr => write!(f, "ATR"),
            Column::BbMid => write!(f, "BB_MID"),
            Column::BbUpper => write!(f, "BB_UPPER"),
            Column::BbLower => write!(f, "BB_LOWER"),
            Column::BbWidth => write!(f, "BB_WIDTH"),
            Column::Macd => write!(f, "MACD"),
            Column::MacdSignal => write!(f, "MACD_SIGNAL"),
            Column::MacdHist => write!(f, "MACD_HIST"),
            Column::Vwap => write!(f, "VWAP"),
        }
    }
}

/// Per-indicator window and parameter overrides, with the documented defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_window: usize,
    pub atr_window: usize,
    pub bb_window: usize,
    pub bb_std: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub vol_window: usize,
    pub vol_factor: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            rsi_window: 14,
            atr_window: 14,
            bb_window: 20,
            bb_std: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            vol_window: 20,
            vol_factor: 1.5,
        }
    }
}

/// A bar series plus computed indicator columns.
///
/// The engine builds this from a copy of the input bars; the caller's series is
/// never mutated. The volume-spike flag lives apart from the numeric columns:
/// per its contract an undefined rolling mean yields `false`, not "undefined".
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedSeries {
    bars: Vec<Bar>,
    columns: HashMap<Column, Vec<Option<f64>>>,
    volume_spike: Option<Vec<bool>>,
}

impl AugmentedSeries {
    pub(crate) fn new(bars: Vec<Bar>) -> Self {
        Self {
            bars,
            columns: HashMap::new(),
            volume_spike: None,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub(crate) fn insert(&mut self, column: Column, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.bars.len());
        self.columns.insert(column, values);
    }

    pub(crate) fn set_volume_spike(&mut self, flags: Vec<bool>) {
        debug_assert_eq!(flags.len(), self.bars.len());
        self.volume_spike = Some(flags);
    }

    /// Full column by key, or `None` if it was never computed.
    pub fn column(&self, column: Column) -> Option<&[Option<f64>]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    /// Single cell: `None` when the column is absent or the value undefined.
    pub fn value(&self, column: Column, index: usize) -> Option<f64> {
        self.columns.get(&column)?.get(index).copied().flatten()
    }

    pub fn last_value(&self, column: Column) -> Option<f64> {
        if self.bars.is_empty() {
            return None;
        }
        self.value(column, self.bars.len() - 1)
    }

    pub fn volume_spike(&self) -> Option<&[bool]> {
        self.volume_spike.as_deref()
    }

    /// Spike flag at `index`; absent column or out-of-range reads as `false`.
    pub fn spike_at(&self, index: usize) -> bool {
        self.volume_spike
            .as_ref()
            .and_then(|v| v.get(index).copied())
            .unwrap_or(false)
    }

    /// Computed column keys in stable (sorted) order, for column-wise export.
    pub fn column_keys(&self) -> Vec<Column> {
        let mut keys: Vec<Column> = self.columns.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Last `n` rows as a new series, for charting consumers that slice the
    /// tail without recomputation.
    pub fn tail(&self, n: usize) -> AugmentedSeries {
        let start = self.bars.len().saturating_sub(n);
        AugmentedSeries {
            bars: self.bars[start..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(k, v)| (*k, v[start..].to_vec()))
                .collect(),
            volume_spike: self.volume_spike.as_ref().map(|v| v[start..].to_vec()),
        }
    }
}
