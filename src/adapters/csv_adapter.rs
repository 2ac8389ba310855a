//! CSV file data adapter.
//!
//! One file per ticker at `<base>/<TICKER>.csv` with a
//! `date,open,high,low,close,volume` header. An optional `<base>/tickers.csv`
//! (`ticker,name,industry`) supplies listing metadata.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::bar::{Bar, BarSeries};
use crate::domain::error::ScoutError;
use crate::domain::recommend::TickerInfo;
use crate::ports::data_port::DataPort;

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn parse_field<T: std::str::FromStr>(
        record: &csv::StringRecord,
        index: usize,
        column: &str,
    ) -> Result<T, ScoutError>
    where
        T::Err: std::fmt::Display,
    {
        let raw = record.get(index).ok_or_else(|| ScoutError::Data {
            reason: format!("short row: missing {} value", column),
        })?;
        raw.trim().parse().map_err(|e| ScoutError::Data {
            reason: format!("invalid {} value {:?}: {}", column, raw, e),
        })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<BarSeries, ScoutError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Err(ScoutError::NoData {
                ticker: ticker.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| ScoutError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let index_of = |column: &str| -> Result<usize, ScoutError> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| ScoutError::Schema {
                    column: column.to_string(),
                })
        };
        let mut indices = [0usize; 6];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = index_of(column)?;
        }
        let [date_i, open_i, high_i, low_i, close_i, volume_i] = indices;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| ScoutError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_i).ok_or_else(|| ScoutError::Data {
                reason: "short row: missing date value".to_string(),
            })?;
            let date =
                NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                    ScoutError::Data {
                        reason: format!("invalid date {:?}: {}", date_str, e),
                    }
                })?;

            if start_date.is_some_and(|start| date < start)
                || end_date.is_some_and(|end| date > end)
            {
                continue;
            }

            bars.push(Bar {
                date,
                open: Self::parse_field(&record, open_i, "open")?,
                high: Self::parse_field(&record, high_i, "high")?,
                low: Self::parse_field(&record, low_i, "low")?,
                close: Self::parse_field(&record, close_i, "close")?,
                volume: Self::parse_field(&record, volume_i, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        let series = BarSeries::new(bars);
        series.validate()?;
        Ok(series)
    }

    fn list_tickers(&self) -> Result<Vec<String>, ScoutError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut tickers = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".csv") {
                if !stem.eq_ignore_ascii_case("tickers") {
                    tickers.push(stem.to_uppercase());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn ticker_info(&self, ticker: &str) -> Result<Option<TickerInfo>, ScoutError> {
        let path = self.base_path.join("tickers.csv");
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        for result in rdr.records() {
            let record = result.map_err(|e| ScoutError::Data {
                reason: format!("CSV parse error in tickers.csv: {}", e),
            })?;
            if record
                .get(0)
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(ticker))
            {
                return Ok(Some(TickerInfo {
                    name: record.get(1).unwrap_or("").trim().to_string(),
                    industry: record.get(2).unwrap_or("").trim().to_string(),
                }));
            }
        }
        Ok(None)
    }
}
