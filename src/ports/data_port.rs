//! Data access port trait.

use chrono::NaiveDate;

use crate::domain::bar::BarSeries;
use crate::domain::error::ScoutError;
use crate::domain::recommend::TickerInfo;

pub trait DataPort {
    /// Bars for one ticker, ascending by date, optionally clipped to a range.
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<BarSeries, ScoutError>;

    fn list_tickers(&self) -> Result<Vec<String>, ScoutError>;

    /// Listing metadata, when the source carries any.
    fn ticker_info(&self, ticker: &str) -> Result<Option<TickerInfo>, ScoutError>;
}
