//! Trade recommendation scoring.
//!
//! A preset (day-trade or swing) fixes the indicator set and level parameters.
//! Candidates are screened on activity rules first; survivors get
//! support/resistance levels from the recent range, an entry zone, a target,
//! a stop, and a rating derived from the risk/reward ratio. A degenerate range
//! (resistance == support) yields no recommendation rather than an error.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::ScoutError;
use crate::domain::indicator::{
    compute_indicators, rolling::rolling_mean, AugmentedSeries, Column, IndicatorKind,
    IndicatorParams,
};
use crate::ports::data_port::DataPort;

/// Optional listing metadata attached to a recommendation when the data source
/// knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub name: String,
    pub industry: String,
}

/// Rating buckets over the risk/reward ratio. Boundaries are exclusive, so a
/// ratio sitting exactly on one falls into the lower bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Strong,
    Recommended,
    Cautious,
    NotRecommended,
}

impl Rating {
    pub fn from_risk_reward(ratio: f64) -> Self {
        if ratio > 2.0 {
            Rating::Strong
        } else if ratio > 1.5 {
            Rating::Recommended
        } else if ratio > 1.0 {
            Rating::Cautious
        } else {
            Rating::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Strong => "Strongly Recommended",
            Rating::Recommended => "Recommended",
            Rating::Cautious => "Cautiously Recommended",
            Rating::NotRecommended => "Not Recommended",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything that distinguishes the day-trade and swing styles: indicator
/// set, range lookback, level fractions, and the screening bar.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendPreset {
    pub name: &'static str,
    pub indicators: Vec<IndicatorKind>,
    pub params: IndicatorParams,
    pub lookback: usize,
    pub entry_frac: f64,
    pub target_frac: f64,
    pub stop_atr_mult: f64,
    pub floor_pct: f64,
    pub min_bars: usize,
    pub min_screen_score: f64,
}

impl RecommendPreset {
    /// Short moving averages and a higher screening bar: only the most active
    /// candidates qualify.
    pub fn day_trade() -> Self {
        RecommendPreset {
            name: "day",
            indicators: Self::indicator_set(&[5, 20, 60]),
            params: IndicatorParams::default(),
            lookback: 10,
            entry_frac: 0.4,
            target_frac: 0.1,
            stop_atr_mult: 1.5,
            floor_pct: 0.05,
            min_bars: 25,
            min_screen_score: 1.0,
        }
    }

    /// Longer moving averages and a lower screening bar.
    pub fn swing() -> Self {
        RecommendPreset {
            indicators: Self::indicator_set(&[20, 50, 200]),
            name: "swing",
            min_screen_score: 0.5,
            ..Self::day_trade()
        }
    }

    fn indicator_set(ma_windows: &[usize]) -> Vec<IndicatorKind> {
        let mut kinds: Vec<IndicatorKind> =
            ma_windows.iter().map(|&w| IndicatorKind::Ma(w)).collect();
        kinds.extend([
            IndicatorKind::Rsi,
            IndicatorKind::Atr,
            IndicatorKind::Bbands,
            IndicatorKind::Macd,
            IndicatorKind::Vwap,
            IndicatorKind::VolumeSpike,
        ]);
        kinds
    }
}

/// Activity screen outcome: additive score plus the human-readable criteria
/// that fired.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenResult {
    pub score: f64,
    pub criteria: Vec<String>,
}

/// Score a candidate's recent activity. Rules that cannot be evaluated yet
/// (warm-up, short history) contribute nothing.
pub fn screen_candidate(frame: &AugmentedSeries, params: &IndicatorParams) -> ScreenResult {
    let mut result = ScreenResult::default();
    let bars = frame.bars();
    let Some(last) = bars.last() else {
        return result;
    };
    let n = bars.len();

    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
    if let Some(Some(avg)) = rolling_mean(&volumes, params.vol_window).last() {
        if *avg > 0.0 {
            let ratio = last.volume as f64 / avg;
            if ratio > 1.5 {
                result.score += 1.0;
                result.criteria.push(format!("volume {:.1}x average", ratio));
            }
        }
    }

    if let Some(atr) = frame.last_value(Column::Atr) {
        if last.close > 0.0 {
            let ratio = atr / last.close;
            if ratio > 0.02 {
                result.score += 1.0;
                result
                    .criteria
                    .push(format!("ATR {:.1}% of price", ratio * 100.0));
            }
        }
    }

    if n > 5 && bars[n - 6].close != 0.0 {
        let move_pct = (last.close / bars[n - 6].close - 1.0) * 100.0;
        if move_pct.abs() > 3.0 {
            result.score += 1.0;
            result
                .criteria
                .push(format!("moved {:.1}% over 5 bars", move_pct));
        }
    }

    if let Some(rsi) = frame.last_value(Column::Rsi) {
        if rsi > 30.0 && rsi < 70.0 {
            result.score += 0.5;
            result.criteria.push(format!("RSI {:.0} in tradable range", rsi));
        }
    }

    result
}

/// One scored recommendation. Numeric fields only; rounding and range
/// formatting belong to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub price: f64,
    pub support: f64,
    pub resistance: f64,
    pub entry_low: f64,
    pub entry_high: f64,
    pub target: f64,
    pub stop_loss: f64,
    pub risk_reward: f64,
    pub rating: Rating,
    pub screen_score: f64,
    pub criteria: Vec<String>,
}

/// Derive levels and a rating for one candidate. Returns `None` only when the
/// recent range is degenerate; a non-positive risk yields ratio 0 and the
/// lowest rating instead of dropping the ticker.
pub fn score(
    ticker: &str,
    frame: &AugmentedSeries,
    preset: &RecommendPreset,
    info: Option<&TickerInfo>,
    screen: ScreenResult,
) -> Option<Recommendation> {
    let bars = frame.bars();
    let last = bars.last()?;
    let start = bars.len().saturating_sub(preset.lookback);
    let window = &bars[start..];

    let support = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let resistance = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = resistance - support;
    if !(range > 0.0) {
        return None;
    }

    let price = last.close;
    let entry_low = support;
    let entry_high = support + preset.entry_frac * range;
    let target = resistance - preset.target_frac * range;

    // Stop: an ATR cushion below support, but never further than the
    // percentage floor below support or the current price. The ATR term drops
    // out while the indicator is still warming up.
    let mut stop = f64::max(
        support * (1.0 - preset.floor_pct),
        price * (1.0 - preset.floor_pct),
    );
    if let Some(atr) = frame.last_value(Column::Atr) {
        stop = stop.max(support - preset.stop_atr_mult * atr);
    }

    // Risk and reward are both measured from the top of the entry zone, the
    // price a disciplined entry would pay.
    let risk = entry_high - stop;
    let reward = target - entry_high;
    let risk_reward = if risk > 0.0 { reward / risk } else { 0.0 };

    Some(Recommendation {
        ticker: ticker.to_string(),
        name: info.map(|i| i.name.clone()),
        industry: info.map(|i| i.industry.clone()),
        price,
        support,
        resistance,
        entry_low,
        entry_high,
        target,
        stop_loss: stop,
        risk_reward,
        rating: Rating::from_risk_reward(risk_reward),
        screen_score: screen.score,
        criteria: screen.criteria,
    })
}

/// Parse a comma-separated ticker list: trimmed, uppercased, no empties, no
/// duplicates.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, ScoutError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ScoutError::TickerList {
                reason: "empty ticker in list".to_string(),
            });
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(ScoutError::TickerList {
                reason: format!("duplicate ticker: {}", ticker),
            });
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

/// Screen and score a batch of tickers, best risk/reward first. Per-ticker
/// data problems are warned and skipped so one bad ticker never takes down the
/// run; only a batch with no usable data at all is an error.
pub fn recommend_batch(
    data: &dyn DataPort,
    tickers: &[String],
    preset: &RecommendPreset,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Vec<Recommendation>, ScoutError> {
    let mut recommendations = Vec::new();
    let mut usable = 0usize;

    for ticker in tickers {
        let series = match data.fetch_bars(ticker, start_date, end_date) {
            Ok(series) => series,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", ticker, e);
                continue;
            }
        };

        if series.is_empty() {
            eprintln!("Warning: skipping {} (no data found)", ticker);
            continue;
        }
        if series.len() < preset.min_bars {
            let err = ScoutError::InsufficientHistory {
                ticker: ticker.clone(),
                bars: series.len(),
                minimum: preset.min_bars,
            };
            eprintln!("Warning: skipping {} ({})", ticker, err);
            continue;
        }
        usable += 1;

        let frame = compute_indicators(&series, &preset.indicators, &preset.params);
        let screen = screen_candidate(&frame, &preset.params);
        if screen.score < preset.min_screen_score {
            eprintln!(
                "  {}: screened out (score {:.1}, need {:.1})",
                ticker, screen.score, preset.min_screen_score
            );
            continue;
        }

        let info = data.ticker_info(ticker).ok().flatten();
        match score(ticker, &frame, preset, info.as_ref(), screen) {
            Some(rec) => {
                eprintln!("  {}: {} [OK]", ticker, rec.rating);
                recommendations.push(rec);
            }
            None => {
                eprintln!("  {}: no tradable range", ticker);
            }
        }
    }

    if usable == 0 && !tickers.is_empty() {
        return Err(ScoutError::NoData {
            ticker: tickers.join(", "),
        });
    }

    recommendations.sort_by(|a, b| {
        b.risk_reward
            .partial_cmp(&a.risk_reward)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::{Bar, BarSeries};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bar(i: usize, low: f64, high: f64, close: f64, volume: i64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Duration::days(i as i64),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    /// 12 bars whose last-10 range is exactly [90, 110] with a final close of
    /// 95. Short enough that ATR is still undefined.
    fn range_bars() -> Vec<Bar> {
        let closes = [
            100.0, 99.0, 95.0, 94.0, 93.0, 92.0, 91.0, 92.0, 93.0, 94.0, 96.0, 95.0,
        ];
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let (low, high) = match i {
                    4 => (90.0, close + 1.0),
                    8 => (close - 1.0, 110.0),
                    _ => (close - 1.0, close + 1.0),
                };
                bar(i, low, high, close, 1000)
            })
            .collect()
    }

    #[test]
    fn rating_boundaries_fall_to_lower_bucket() {
        assert_eq!(Rating::from_risk_reward(2.5), Rating::Strong);
        assert_eq!(Rating::from_risk_reward(2.0), Rating::Recommended);
        assert_eq!(Rating::from_risk_reward(1.6), Rating::Recommended);
        assert_eq!(Rating::from_risk_reward(1.5), Rating::Cautious);
        assert_eq!(Rating::from_risk_reward(1.1), Rating::Cautious);
        assert_eq!(Rating::from_risk_reward(1.0), Rating::NotRecommended);
        assert_eq!(Rating::from_risk_reward(0.0), Rating::NotRecommended);
        assert_eq!(Rating::from_risk_reward(-1.0), Rating::NotRecommended);
    }

    #[test]
    fn presets_differ_where_expected() {
        let day = RecommendPreset::day_trade();
        let swing = RecommendPreset::swing();
        assert!(day.indicators.contains(&IndicatorKind::Ma(5)));
        assert!(swing.indicators.contains(&IndicatorKind::Ma(200)));
        assert!(day.min_screen_score > swing.min_screen_score);
        assert_eq!(day.lookback, swing.lookback);
        assert_eq!(day.min_bars, 25);
    }

    #[test]
    fn score_levels_from_range() {
        let series = BarSeries::new(range_bars());
        let preset = RecommendPreset::day_trade();
        let frame = compute_indicators(&series, &preset.indicators, &preset.params);

        let rec = score("TEST", &frame, &preset, None, ScreenResult::default()).unwrap();
        assert_relative_eq!(rec.support, 90.0);
        assert_relative_eq!(rec.resistance, 110.0);
        assert_relative_eq!(rec.price, 95.0);
        // Entry zone covers the lower 40% of the range; target shaves 10% off
        // the top.
        assert_relative_eq!(rec.entry_low, 90.0);
        assert_relative_eq!(rec.entry_high, 98.0);
        assert_relative_eq!(rec.target, 108.0);
        // ATR undefined at 12 bars, so the stop is the 5% floor under price.
        assert_relative_eq!(rec.stop_loss, 95.0 * 0.95);
        // Risk/reward measured from entry_high: (108−98)/(98−90.25).
        assert_relative_eq!(rec.risk_reward, 10.0 / 7.75, max_relative = 1e-12);
        assert_eq!(rec.rating, Rating::Cautious);
    }

    #[test]
    fn non_positive_risk_rates_zero_not_skipped() {
        // Price well above the entry zone pulls the 5% price floor above
        // entry_high, so risk is negative; the candidate is still emitted
        // with ratio 0 and the lowest rating.
        let bars: Vec<Bar> = (0..12)
            .map(|i| {
                let (low, high) = match i {
                    4 => (90.0, 106.0),
                    8 => (104.0, 110.0),
                    _ => (104.0, 106.0),
                };
                bar(i, low, high, 105.0, 1000)
            })
            .collect();
        let series = BarSeries::new(bars);
        let preset = RecommendPreset::day_trade();
        let frame = compute_indicators(&series, &preset.indicators, &preset.params);

        let rec = score("HOT", &frame, &preset, None, ScreenResult::default()).unwrap();
        // entry_high = 90 + 0.4×20 = 98; stop = 105×0.95 = 99.75 > entry_high.
        assert_relative_eq!(rec.entry_high, 98.0);
        assert!(rec.stop_loss > rec.entry_high);
        assert_relative_eq!(rec.risk_reward, 0.0);
        assert_eq!(rec.rating, Rating::NotRecommended);
    }

    #[test]
    fn score_attaches_ticker_info() {
        let series = BarSeries::new(range_bars());
        let preset = RecommendPreset::day_trade();
        let frame = compute_indicators(&series, &preset.indicators, &preset.params);
        let info = TickerInfo {
            name: "Test Corp".into(),
            industry: "Semiconductors".into(),
        };
        let rec = score("TEST", &frame, &preset, Some(&info), ScreenResult::default()).unwrap();
        assert_eq!(rec.name.as_deref(), Some("Test Corp"));
        assert_eq!(rec.industry.as_deref(), Some("Semiconductors"));
    }

    #[test]
    fn degenerate_range_yields_none() {
        let bars: Vec<Bar> = (0..30).map(|i| bar(i, 100.0, 100.0, 100.0, 1000)).collect();
        let series = BarSeries::new(bars);
        let preset = RecommendPreset::day_trade();
        let frame = compute_indicators(&series, &preset.indicators, &preset.params);
        assert!(score("FLAT", &frame, &preset, None, ScreenResult::default()).is_none());
    }

    #[test]
    fn screen_scores_five_bar_move() {
        let series = BarSeries::new(range_bars());
        let preset = RecommendPreset::day_trade();
        let frame = compute_indicators(&series, &preset.indicators, &preset.params);
        // 95 vs 91 five bars back is a 4.4% move; volume is flat, ATR and RSI
        // are still warming up.
        let screen = screen_candidate(&frame, &preset.params);
        assert_relative_eq!(screen.score, 1.0);
        assert_eq!(screen.criteria.len(), 1);
        assert!(screen.criteria[0].contains("5 bars"));
    }

    #[test]
    fn screen_scores_volume_surge() {
        let mut bars: Vec<Bar> = (0..30).map(|i| bar(i, 99.0, 101.0, 100.0, 1000)).collect();
        bars[29].volume = 5000;
        let preset = RecommendPreset::day_trade();
        let frame = compute_indicators(&BarSeries::new(bars), &preset.indicators, &preset.params);
        let screen = screen_candidate(&frame, &preset.params);
        assert!(screen.criteria.iter().any(|c| c.contains("volume")));
        assert!(screen.score >= 1.0);
    }

    #[test]
    fn screen_empty_frame_is_zero() {
        let preset = RecommendPreset::day_trade();
        let frame = compute_indicators(
            &BarSeries::new(vec![]),
            &preset.indicators,
            &preset.params,
        );
        let screen = screen_candidate(&frame, &preset.params);
        assert_relative_eq!(screen.score, 0.0);
        assert!(screen.criteria.is_empty());
    }

    #[test]
    fn parse_tickers_normalizes() {
        let tickers = parse_tickers(" aapl , msft ,NVDA").unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn parse_tickers_rejects_empty_token() {
        assert!(matches!(
            parse_tickers("AAPL,,MSFT"),
            Err(ScoutError::TickerList { .. })
        ));
    }

    #[test]
    fn parse_tickers_rejects_duplicates() {
        let err = parse_tickers("AAPL,aapl").unwrap_err();
        assert!(err.to_string().contains("duplicate ticker: AAPL"));
    }

    #[test]
    fn recommendation_round_trips_through_json() {
        let series = BarSeries::new(range_bars());
        let preset = RecommendPreset::day_trade();
        let frame = compute_indicators(&series, &preset.indicators, &preset.params);
        let rec = score("TEST", &frame, &preset, None, ScreenResult::default()).unwrap();

        let encoded = serde_json::to_string(&rec).unwrap();
        let decoded: Recommendation = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, rec);
    }
}
