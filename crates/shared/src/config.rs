//! Application configuration management.

use serde::Deserialize;

use crate::types::{CurrencyFormat, FormatError};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// How amounts are written and read.
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Currency configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol shown by the full and display formats.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Subunit digits (2 means 1/100 subunits).
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Single-character thousands separator.
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

fn default_symbol() -> String {
    "₹".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPLITLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Builds the validated currency format described by the `currency` section.
    pub fn currency_format(&self) -> Result<CurrencyFormat, FormatError> {
        let separator = &self.currency.thousands_separator;
        let mut chars = separator.chars();
        let (Some(sep), None) = (chars.next(), chars.next()) else {
            return Err(FormatError::InvalidSeparator(separator.clone()));
        };
        CurrencyFormat::new(self.currency.symbol.as_str(), self.currency.decimal_places, sep)
    }
}
