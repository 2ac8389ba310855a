//! INI file configuration adapter.
//!
//! Sections used by the CLI: `[data]` (bars_path), `[backtest]`
//! (initial_capital, strategy windows), `[indicators]` (window overrides),
//! `[recommend]` (preset, level fractions). Every key is optional; getters
//! fall back to the caller's default.

use std::path::Path;

use configparser::ini::Ini;

use crate::domain::error::ScoutError;
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScoutError> {
        let mut config = Ini::new();
        config.load(&path).map_err(|e| ScoutError::ConfigParse {
            file: path.as_ref().display().to_string(),
            reason: e,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, ScoutError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|e| ScoutError::ConfigParse {
                file: "<inline>".to_string(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}
