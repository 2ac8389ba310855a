//! OHLCV bar and bar-series representation.
//!
//! A `Bar` is one trading session. A `BarSeries` is ordered ascending by date
//! with unique dates; that ordering is required by every rolling computation
//! downstream and is checked at the ingestion boundary via [`BarSeries::validate`],
//! not defensively inside the engine.

use chrono::NaiveDate;

use super::error::ScoutError;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
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

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Check the ascending-unique-dates invariant. Adapters call this after
    /// loading; the indicator and backtest engines assume it holds.
    pub fn validate(&self) -> Result<(), ScoutError> {
        for pair in self.bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ScoutError::Series {
                    reason: format!(
                        "dates not strictly ascending: {} followed by {}",
                        pair[0].date, pair[1].date
                    ),
                });
            }
        }
        Ok(())
    }
}
