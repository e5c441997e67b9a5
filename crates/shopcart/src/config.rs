//! # Cart Configuration
//!
//! Default tax rate, number format and session key for a cart.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHOPCART_DEFAULT_TAX=8.25                                          │
//! │     SHOPCART_DECIMALS=2                                                │
//! │     SHOPCART_DECIMAL_SEPARATOR=.                                       │
//! │     SHOPCART_THOUSANDS_SEPARATOR=,                                     │
//! │     SHOPCART_SESSION_KEY=shopcart.default                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/shopcart/shopcart.toml (Linux)                           │
//! │     ~/Library/Application Support/dev.shopcart.shopcart/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     8.25% tax, 2 decimals, "." and ","                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! default_tax = 8.25
//! session_key = "shopcart.default"
//!
//! [number_format]
//! decimals = 2
//! decimal_separator = "."
//! thousands_separator = ","
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use shopcart_core::{NumberFormat, MAX_DECIMALS};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::DEFAULT_SESSION_KEY;

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopCartConfig {
    /// Tax percentage applied to items added without one.
    #[serde(default = "default_tax")]
    pub default_tax: f64,

    /// Session key the cart is stored under.
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// Formatting used by `CartManager::total`.
    #[serde(default)]
    pub number_format: NumberFormat,
}

fn default_tax() -> f64 {
    8.25
}

fn default_session_key() -> String {
    DEFAULT_SESSION_KEY.to_string()
}

impl Default for ShopCartConfig {
    fn default() -> Self {
        ShopCartConfig {
            default_tax: default_tax(),
            session_key: default_session_key(),
            number_format: NumberFormat::default(),
        }
    }
}

impl ShopCartConfig {
    /// Defaults with a different default tax rate.
    pub fn with_default_tax(mut self, tax: f64) -> Self {
        self.default_tax = tax;
        self
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (shopcart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.default_tax.is_finite() || self.default_tax < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_tax must be a non-negative number, got {}",
                self.default_tax
            )));
        }

        if self.session_key.trim().is_empty() {
            return Err(ConfigError::Invalid("session_key must not be empty".into()));
        }

        if self.number_format.decimals > MAX_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "number_format.decimals must be at most {}, got {}",
                MAX_DECIMALS, self.number_format.decimals
            )));
        }

        Ok(())
    }

    /// Applies `SHOPCART_*` overrides read through `lookup`.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("SHOPCART_DEFAULT_TAX") {
            match raw.trim().parse::<f64>() {
                Ok(tax) => self.default_tax = tax,
                Err(_) => warn!(value = %raw, "Ignoring invalid SHOPCART_DEFAULT_TAX"),
            }
        }

        if let Some(raw) = lookup("SHOPCART_DECIMALS") {
            match raw.trim().parse::<u32>() {
                Ok(decimals) => self.number_format.decimals = decimals,
                Err(_) => warn!(value = %raw, "Ignoring invalid SHOPCART_DECIMALS"),
            }
        }

        if let Some(sep) = lookup("SHOPCART_DECIMAL_SEPARATOR") {
            self.number_format.decimal_separator = sep;
        }

        if let Some(sep) = lookup("SHOPCART_THOUSANDS_SEPARATOR") {
            self.number_format.thousands_separator = sep;
        }

        if let Some(key) = lookup("SHOPCART_SESSION_KEY") {
            self.session_key = key;
        }
    }

    /// Platform config file location, if a home directory is known.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "shopcart", "shopcart")
            .map(|dirs| dirs.config_dir().join("shopcart.toml"))
    }
}
