//! Domain error types.
//!
//! Only `Schema` aborts a per-ticker computation outright. Degenerate price
//! ranges and divide-by-zero candidates are not errors: they degrade to
//! `None`/`0` so one bad ticker never takes down a batch.

/// Top-level error type for stockscout.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("bar data missing required column: {column}")]
    Schema { column: String },

    #[error("bad bar series: {reason}")]
    Series { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient history for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientHistory {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("strategy produced {actual} signals for {expected} bars")]
    StrategyOutput { expected: usize, actual: usize },

    #[error("unknown indicator: {name}")]
    UnknownIndicator { name: String },

    #[error("invalid ticker list: {reason}")]
    TickerList { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScoutError> for std::process::ExitCode {
    fn from(err: &ScoutError) -> Self {
        let code: u8 = match err {
            ScoutError::Io(_) => 1,
            ScoutError::ConfigParse { .. }
            | ScoutError::ConfigMissing { .. }
            | ScoutError::ConfigInvalid { .. } => 2,
            ScoutError::Schema { .. } | ScoutError::Series { .. } | ScoutError::Data { .. } => 3,
            ScoutError::StrategyOutput { .. }
            | ScoutError::UnknownIndicator { .. }
            | ScoutError::TickerList { .. } => 4,
            ScoutError::NoData { .. } | ScoutError::InsufficientHistory { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
