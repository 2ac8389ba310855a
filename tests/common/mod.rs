#![allow(dead_code)]

use std::collections::HashMap;

use chrono::NaiveDate;
use stockscout::domain::bar::{Bar, BarSeries};
use stockscout::domain::error::ScoutError;
use stockscout::domain::recommend::TickerInfo;
use stockscout::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub info: HashMap<String, TickerInfo>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            info: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_info(mut self, ticker: &str, name: &str, industry: &str) -> Self {
        self.info.insert(
            ticker.to_string(),
            TickerInfo {
                name: name.to_string(),
                industry: industry.to_string(),
            },
        );
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<BarSeries, ScoutError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScoutError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(ticker)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| {
                start_date.is_none_or(|s| b.date >= s) && end_date.is_none_or(|e| b.date <= e)
            })
            .collect();
        Ok(BarSeries::new(bars))
    }

    fn list_tickers(&self) -> Result<Vec<String>, ScoutError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn ticker_info(&self, ticker: &str) -> Result<Option<TickerInfo>, ScoutError> {
        Ok(self.info.get(ticker).cloned())
    }
}

pub fn make_bar(date: &str, close: f64) -> Bar {
    Bar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// `n` daily bars from 2024-01-01 with closes produced by `f(i)`.
pub fn make_bars_with<F: Fn(usize) -> f64>(n: usize, f: F) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = f(i);
            Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close - 1.0,
                high: close + 1.0,
                low: close - 2.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}
