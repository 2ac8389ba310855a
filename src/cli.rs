//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestResult};
use crate::domain::error::ScoutError;
use crate::domain::indicator::{compute_indicators, IndicatorKind, IndicatorParams};
use crate::domain::recommend::{
    parse_tickers, recommend_batch, Recommendation, RecommendPreset,
};
use crate::domain::signal::{CompositeParams, Strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stockscout", about = "Indicator-driven stock screener and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    Crossover,
    Composite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PresetKind {
    Day,
    Swing,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest a strategy over one ticker
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        ticker: String,
        #[arg(long, value_enum, default_value = "crossover")]
        strategy: StrategyKind,
        /// Short MA window (crossover strategy)
        #[arg(long)]
        short: Option<usize>,
        /// Long MA window (crossover strategy)
        #[arg(long)]
        long: Option<usize>,
        #[arg(long)]
        capital: Option<f64>,
        /// Emit the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Screen and rate a list of tickers
    Recommend {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated ticker list
        #[arg(long)]
        tickers: String,
        #[arg(long, value_enum, default_value = "day")]
        preset: PresetKind,
        #[arg(long)]
        json: bool,
    },
    /// Print the indicator table for one ticker
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        ticker: String,
        /// Comma-separated indicator names (default: MA5,MA20,RSI,MACD,BBANDS)
        #[arg(long)]
        indicators: Option<String>,
        /// Rows to print from the end of the series
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            ticker,
            strategy,
            short,
            long,
            capital,
            json,
        } => cmd_backtest(config.as_ref(), &ticker, strategy, short, long, capital, json),
        Command::Recommend {
            config,
            tickers,
            preset,
            json,
        } => cmd_recommend(config.as_ref(), &tickers, preset, json),
        Command::Analyze {
            config,
            ticker,
            indicators,
            last,
        } => cmd_analyze(config.as_ref(), &ticker, indicators.as_deref(), last),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ScoutError> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            FileConfigAdapter::from_file(p)
        }
        None => FileConfigAdapter::from_string(""),
    }
}

fn data_adapter(config: &dyn ConfigPort) -> CsvAdapter {
    let base = config
        .get_string("data", "bars_path")
        .unwrap_or_else(|| "data".to_string());
    CsvAdapter::new(PathBuf::from(base))
}

fn config_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, ScoutError> {
    match config.get_string("data", key) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ScoutError::ConfigInvalid {
                section: "data".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }),
    }
}

pub fn build_indicator_params(config: &dyn ConfigPort) -> IndicatorParams {
    let d = IndicatorParams::default();
    IndicatorParams {
        rsi_window: config.get_int("indicators", "rsi_window", d.rsi_window as i64) as usize,
        atr_window: config.get_int("indicators", "atr_window", d.atr_window as i64) as usize,
        bb_window: config.get_int("indicators", "bb_window", d.bb_window as i64) as usize,
        bb_std: config.get_double("indicators", "bb_std", d.bb_std),
        macd_fast: config.get_int("indicators", "macd_fast", d.macd_fast as i64) as usize,
        macd_slow: config.get_int("indicators", "macd_slow", d.macd_slow as i64) as usize,
        macd_signal: config.get_int("indicators", "macd_signal", d.macd_signal as i64) as usize,
        vol_window: config.get_int("indicators", "vol_window", d.vol_window as i64) as usize,
        vol_factor: config.get_double("indicators", "vol_factor", d.vol_factor),
    }
}

pub fn build_strategy(
    kind: StrategyKind,
    short: Option<usize>,
    long: Option<usize>,
    config: &dyn ConfigPort,
) -> Result<Strategy, ScoutError> {
    match kind {
        StrategyKind::Crossover => {
            let short_window = short
                .unwrap_or_else(|| config.get_int("backtest", "short_window", 5) as usize);
            let long_window =
                long.unwrap_or_else(|| config.get_int("backtest", "long_window", 20) as usize);
            if short_window == 0 || short_window >= long_window {
                return Err(ScoutError::ConfigInvalid {
                    section: "backtest".into(),
                    key: "short_window".into(),
                    reason: format!(
                        "short window {} must be positive and below long window {}",
                        short_window, long_window
                    ),
                });
            }
            Ok(Strategy::MaCrossover {
                short_window,
                long_window,
            })
        }
        StrategyKind::Composite => {
            let d = CompositeParams::default();
            Ok(Strategy::Composite(CompositeParams {
                ma_short: config.get_int("backtest", "ma_short", d.ma_short as i64) as usize,
                ma_mid: config.get_int("backtest", "ma_mid", d.ma_mid as i64) as usize,
                ma_long: config.get_int("backtest", "ma_long", d.ma_long as i64) as usize,
                weights: d.weights,
                indicators: build_indicator_params(config),
            }))
        }
    }
}

pub fn build_preset(kind: PresetKind, config: &dyn ConfigPort) -> RecommendPreset {
    let mut preset = match kind {
        PresetKind::Day => RecommendPreset::day_trade(),
        PresetKind::Swing => RecommendPreset::swing(),
    };
    preset.params = build_indicator_params(config);
    preset.lookback =
        config.get_int("recommend", "lookback", preset.lookback as i64) as usize;
    preset.entry_frac = config.get_double("recommend", "entry_frac", preset.entry_frac);
    preset.target_frac = config.get_double("recommend", "target_frac", preset.target_frac);
    preset.stop_atr_mult =
        config.get_double("recommend", "stop_atr_mult", preset.stop_atr_mult);
    preset.floor_pct = config.get_double("recommend", "floor_pct", preset.floor_pct);
    preset.min_bars = config.get_int("recommend", "min_bars", preset.min_bars as i64) as usize;
    preset.min_screen_score =
        config.get_double("recommend", "min_score", preset.min_screen_score);
    preset
}

fn cmd_backtest(
    config_path: Option<&PathBuf>,
    ticker: &str,
    strategy_kind: StrategyKind,
    short: Option<usize>,
    long: Option<usize>,
    capital: Option<f64>,
    json: bool,
) -> Result<(), ScoutError> {
    let config = load_config(config_path)?;
    let data = data_adapter(&config);
    let strategy = build_strategy(strategy_kind, short, long, &config)?;
    let initial_capital =
        capital.unwrap_or_else(|| config.get_double("backtest", "initial_capital", 100_000.0));

    let ticker = ticker.trim().to_uppercase();
    let start = config_date(&config, "start_date")?;
    let end = config_date(&config, "end_date")?;

    let series = data.fetch_bars(&ticker, start, end)?;
    if series.is_empty() {
        return Err(ScoutError::NoData { ticker });
    }
    eprintln!("Backtesting {}: {} bars", ticker, series.len());

    let result = run_backtest(&series, &strategy, initial_capital)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.report).map_err(to_data_error)?);
    } else {
        print_backtest_summary(&ticker, &result);
    }
    Ok(())
}

fn print_backtest_summary(ticker: &str, result: &BacktestResult) {
    let report = &result.report;
    println!("=== Backtest: {} ===", ticker);
    println!("Initial capital:  {:.2}", report.initial_capital);
    println!("Final value:      {:.2}", report.final_value);
    println!("Total return:     {:.2}%", report.total_return_pct);
    println!("Sharpe ratio:     {:.2}", report.sharpe_ratio);
    println!("Max drawdown:     {:.1}%", report.max_drawdown_pct);
    println!("Trades:           {}", report.trades);
    println!(
        "Win rate:         {:.1}% ({} profitable)",
        report.win_rate, report.profitable_trades
    );
}

/// Presentation form of a [`Recommendation`]: rounded strings, the entry zone
/// as one range, and the return to target as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationView {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub price: String,
    pub entry: String,
    pub target: String,
    pub stop_loss: String,
    pub potential_return: String,
    pub risk_reward: String,
    pub rating: String,
    pub criteria: Vec<String>,
}

impl From<&Recommendation> for RecommendationView {
    fn from(rec: &Recommendation) -> Self {
        // Return to target from the top of the entry zone, not the last close.
        let potential = if rec.entry_high != 0.0 {
            (rec.target - rec.entry_high) / rec.entry_high * 100.0
        } else {
            0.0
        };
        RecommendationView {
            ticker: rec.ticker.clone(),
            name: rec.name.clone(),
            industry: rec.industry.clone(),
            price: format!("{:.2}", rec.price),
            entry: format!("{:.2} - {:.2}", rec.entry_low, rec.entry_high),
            target: format!("{:.2}", rec.target),
            stop_loss: format!("{:.2}", rec.stop_loss),
            potential_return: format!("{:.1}%", potential),
            risk_reward: format!("{:.2}", rec.risk_reward),
            rating: rec.rating.to_string(),
            criteria: rec.criteria.clone(),
        }
    }
}

fn cmd_recommend(
    config_path: Option<&PathBuf>,
    tickers: &str,
    preset_kind: PresetKind,
    json: bool,
) -> Result<(), ScoutError> {
    let config = load_config(config_path)?;
    let data = data_adapter(&config);
    let preset = build_preset(preset_kind, &config);
    let tickers = parse_tickers(tickers)?;
    let start = config_date(&config, "start_date")?;
    let end = config_date(&config, "end_date")?;

    eprintln!(
        "Screening {} tickers ({} preset)...",
        tickers.len(),
        preset.name
    );
    let recommendations = recommend_batch(&data, &tickers, &preset, start, end)?;
    let views: Vec<RecommendationView> =
        recommendations.iter().map(RecommendationView::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&views).map_err(to_data_error)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("No candidates passed the screen.");
        return Ok(());
    }
    for view in &views {
        let title = match &view.name {
            Some(name) => format!("{} ({})", view.ticker, name),
            None => view.ticker.clone(),
        };
        println!("=== {} — {} ===", title, view.rating);
        if let Some(industry) = &view.industry {
            println!("Industry:         {}", industry);
        }
        println!("Price:            {}", view.price);
        println!("Entry zone:       {}", view.entry);
        println!(
            "Target:           {} ({})",
            view.target, view.potential_return
        );
        println!("Stop loss:        {}", view.stop_loss);
        println!("Risk/reward:      {}", view.risk_reward);
        for criterion in &view.criteria {
            println!("  - {}", criterion);
        }
        println!();
    }
    Ok(())
}

fn cmd_analyze(
    config_path: Option<&PathBuf>,
    ticker: &str,
    indicators: Option<&str>,
    last: usize,
) -> Result<(), ScoutError> {
    let config = load_config(config_path)?;
    let data = data_adapter(&config);
    let params = build_indicator_params(&config);

    let kinds: Vec<IndicatorKind> = match indicators {
        Some(list) => list
            .split(',')
            .map(|name| name.parse())
            .collect::<Result<_, _>>()?,
        None => vec![
            IndicatorKind::Ma(5),
            IndicatorKind::Ma(20),
            IndicatorKind::Rsi,
            IndicatorKind::Macd,
            IndicatorKind::Bbands,
        ],
    };

    let ticker = ticker.trim().to_uppercase();
    let start = config_date(&config, "start_date")?;
    let end = config_date(&config, "end_date")?;
    let series = data.fetch_bars(&ticker, start, end)?;
    if series.is_empty() {
        return Err(ScoutError::NoData { ticker });
    }

    let frame = compute_indicators(&series, &kinds, &params).tail(last);
    let columns = frame.column_keys();

    print!("{:<12} {:>10}", "date", "close");
    for column in &columns {
        print!(" {:>12}", column.to_string());
    }
    println!();

    for (i, bar) in frame.bars().iter().enumerate() {
        print!("{:<12} {:>10.2}", bar.date, bar.close);
        for column in &columns {
            match frame.value(*column, i) {
                Some(v) => print!(" {:>12.2}", v),
                None => print!(" {:>12}", "-"),
            }
        }
        println!();
    }
    Ok(())
}

fn to_data_error(e: serde_json::Error) -> ScoutError {
    ScoutError::Data {
        reason: format!("JSON encode error: {}", e),
    }
}
