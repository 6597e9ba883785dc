use std::{env, ffi::OsString, path::PathBuf};

use crate::{errors::LedgerError, ledger::Quantity, storage::DEFAULT_FILE_NAME};

pub const FILE_ENV: &str = "STOCK_LEDGER_FILE";
pub const THRESHOLD_ENV: &str = "STOCK_LEDGER_THRESHOLD";
const DEFAULT_THRESHOLD: i64 = 5;

/// Runtime settings for the CLI: where the snapshot lives and the default
/// low-stock threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub low_stock_threshold: Quantity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_FILE_NAME),
            low_stock_threshold: Quantity::Int(DEFAULT_THRESHOLD),
        }
    }
}

impl Config {
    /// Defaults overlaid with `STOCK_LEDGER_FILE` and `STOCK_LEDGER_THRESHOLD`.
    pub fn from_env() -> Result<Self, LedgerError> {
        Self::from_vars(env::var_os(FILE_ENV), env::var_os(THRESHOLD_ENV))
    }

    fn from_vars(
        file: Option<OsString>,
        threshold: Option<OsString>,
    ) -> Result<Self, LedgerError> {
        let mut config = Config::default();
        if let Some(file) = file.filter(|value| !value.is_empty()) {
            config.data_file = PathBuf::from(file);
        }
        if let Some(raw) = threshold {
            let text = raw.to_string_lossy();
            config.low_stock_threshold = text.parse().map_err(|_| {
                LedgerError::Config(format!("{THRESHOLD_ENV} is not a number: `{text}`"))
            })?;
        }
        Ok(config)
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_inventory_json_and_five() {
        let config = Config::from_vars(None, None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_file, PathBuf::from("inventory.json"));
        assert_eq!(config.low_stock_threshold, Quantity::Int(5));
    }

    #[test]
    fn env_values_override_defaults() {
        let config = Config::from_vars(
            Some(OsString::from("/tmp/stock.json")),
            Some(OsString::from("2.5")),
        )
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/stock.json"));
        assert_eq!(config.low_stock_threshold, Quantity::Float(2.5));
    }

    #[test]
    fn bad_threshold_is_a_config_error() {
        let err = Config::from_vars(None, Some(OsString::from("plenty"))).unwrap_err();
        assert!(matches!(err, LedgerError::Config(message) if message.contains("plenty")));
    }

    #[test]
    fn cli_flag_overrides_file() {
        let config = Config::default().with_data_file("other.json");
        assert_eq!(config.data_file, PathBuf::from("other.json"));
    }
}
