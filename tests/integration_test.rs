//! End-to-end tests: CSV ingestion through indicators, backtest, and
//! recommendation scoring.

mod common;

use std::fs;

use common::*;
use proptest::prelude::*;
use stockscout::adapters::csv_adapter::CsvAdapter;
use stockscout::domain::backtest::{run_backtest, simulate, BacktestReport};
use stockscout::domain::error::ScoutError;
use stockscout::domain::recommend::{recommend_batch, RecommendPreset};
use stockscout::domain::signal::{Signal, Strategy};
use stockscout::ports::data_port::DataPort;
use tempfile::TempDir;

fn write_rising_csv(dir: &TempDir, ticker: &str, days: usize) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for i in 0..days {
        let close = 100.0 + i as f64;
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            + chrono::Duration::days(i as i64);
        content.push_str(&format!(
            "{},{:.1},{:.1},{:.1},{:.1},{}\n",
            date,
            close - 1.0,
            close + 1.0,
            close - 2.0,
            close,
            1000 + i * 10
        ));
    }
    fs::write(dir.path().join(format!("{}.csv", ticker)), content).unwrap();
}

#[test]
fn csv_to_backtest_pipeline() {
    let dir = TempDir::new().unwrap();
    write_rising_csv(&dir, "UPUP", 40);
    let adapter = CsvAdapter::new(dir.path().to_path_buf());

    let series = adapter.fetch_bars("UPUP", None, None).unwrap();
    assert_eq!(series.len(), 40);

    let strategy = Strategy::MaCrossover {
        short_window: 5,
        long_window: 20,
    };
    let result = run_backtest(&series, &strategy, 100_000.0).unwrap();

    // A monotone rise goes long once the windows fill and never exits.
    assert_eq!(*result.signals.last().unwrap(), Signal::Long);
    assert!(result.report.total_return_pct > 0.0);
    assert!(result.report.sharpe_ratio > 0.0);
    assert_eq!(result.report.max_drawdown_pct, 0.0);
    assert!(result.report.trades >= 1);

    // Report survives a JSON round trip bit-for-bit.
    let encoded = serde_json::to_string(&result.report).unwrap();
    let decoded: BacktestReport = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, result.report);
}

#[test]
fn recommend_batch_skips_bad_tickers() {
    // GOOD: 30 bars, flat then a 5-bar push (clears the day screen).
    let good = make_bars_with(30, |i| if i < 24 { 100.0 } else { 100.0 + (i - 23) as f64 });
    let short = make_bars_with(5, |_| 100.0);

    let port = MockDataPort::new()
        .with_bars("GOOD", good)
        .with_bars("SHORT", short)
        .with_error("BROKEN", "simulated source failure")
        .with_info("GOOD", "Good Corp", "Widgets");

    let tickers = vec![
        "GOOD".to_string(),
        "SHORT".to_string(),
        "BROKEN".to_string(),
        "MISSING".to_string(),
    ];
    let preset = RecommendPreset::day_trade();
    let recs = recommend_batch(&port, &tickers, &preset, None, None).unwrap();

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].ticker, "GOOD");
    assert_eq!(recs[0].name.as_deref(), Some("Good Corp"));
    assert!(recs[0].screen_score >= preset.min_screen_score);
    assert!(recs[0].support < recs[0].resistance);
    assert!(recs[0].stop_loss < recs[0].price);
}

#[test]
fn recommend_batch_all_unusable_is_error() {
    let port = MockDataPort::new().with_error("BAD", "simulated source failure");
    let tickers = vec!["BAD".to_string(), "MISSING".to_string()];
    let preset = RecommendPreset::swing();
    assert!(matches!(
        recommend_batch(&port, &tickers, &preset, None, None),
        Err(ScoutError::NoData { .. })
    ));
}

#[test]
fn recommend_batch_screened_out_is_empty_not_error() {
    // Plenty of history but dead flat: passes the data checks, fails the
    // activity screen.
    let flat = make_bars_with(60, |_| 100.0);
    let port = MockDataPort::new().with_bars("FLAT", flat);
    let preset = RecommendPreset::day_trade();
    let recs = recommend_batch(&port, &["FLAT".to_string()], &preset, None, None).unwrap();
    assert!(recs.is_empty());
}

#[test]
fn recommend_batch_orders_by_risk_reward() {
    // Both pass the screen; TIGHT's price sits nearer its support so its
    // risk/reward is higher.
    let tight = make_bars_with(30, |i| {
        if i < 24 {
            100.0
        } else {
            100.0 - (i - 23) as f64
        }
    });
    let loose = make_bars_with(30, |i| if i < 24 { 100.0 } else { 100.0 + (i - 23) as f64 });

    let port = MockDataPort::new()
        .with_bars("TIGHT", tight)
        .with_bars("LOOSE", loose);
    let preset = RecommendPreset::day_trade();
    let recs = recommend_batch(
        &port,
        &["LOOSE".to_string(), "TIGHT".to_string()],
        &preset,
        None,
        None,
    )
    .unwrap();

    assert_eq!(recs.len(), 2);
    assert!(recs[0].risk_reward >= recs[1].risk_reward);
}

#[test]
fn date_range_clips_before_analysis() {
    let dir = TempDir::new().unwrap();
    write_rising_csv(&dir, "CLIP", 40);
    let adapter = CsvAdapter::new(dir.path().to_path_buf());

    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
    let series = adapter.fetch_bars("CLIP", Some(start), Some(end)).unwrap();
    assert_eq!(series.len(), 10);
    assert_eq!(series.bars()[0].date, start);
    assert_eq!(series.last().unwrap().date, end);
}

proptest! {
    #[test]
    fn simulate_accounting_invariants(
        closes in prop::collection::vec(1.0_f64..1000.0, 1..60),
        signal_codes in prop::collection::vec(0_u8..3, 60),
    ) {
        let bars = make_bars_with(closes.len(), |i| closes[i]);
        let series = stockscout::domain::bar::BarSeries::new(bars);
        let signals: Vec<Signal> = signal_codes[..closes.len()]
            .iter()
            .map(|c| match c {
                0 => Signal::Flat,
                1 => Signal::Long,
                _ => Signal::Short,
            })
            .collect();

        let result = simulate(&series, &signals, 100_000.0).unwrap();

        prop_assert_eq!(result.trajectory.states.len(), closes.len());
        prop_assert_eq!(result.trajectory.returns[0], None);
        for state in &result.trajectory.states {
            prop_assert!((state.total - (state.cash + state.holdings)).abs() < 1e-6);
        }
        prop_assert!(result.report.max_drawdown_pct >= 0.0);
        prop_assert!(result.report.win_rate >= 0.0 && result.report.win_rate <= 100.0);
    }
}
