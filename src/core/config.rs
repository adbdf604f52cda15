use crate::core::currency::{Currency, DEFAULT_TRY_PER_USD};
use crate::core::holding::{CashItem, Holding};
use crate::core::price::PriceQuote;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_retries() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TefasProviderConfig {
    /// Path to the daily fund snapshot JSON.
    pub snapshot_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
    pub tefas: Option<TefasProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
                retries: default_retries(),
                retry_delay_ms: default_retry_delay_ms(),
            }),
            tefas: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FxConfig {
    /// Pinned TRY per USD rate. When set no rate is fetched.
    pub rate: Option<f64>,
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,
}

fn default_fallback_rate() -> f64 {
    DEFAULT_TRY_PER_USD
}

impl Default for FxConfig {
    fn default() -> Self {
        FxConfig {
            rate: None,
            fallback_rate: default_fallback_rate(),
        }
    }
}

fn default_name() -> String {
    "Portföy".to_string()
}

fn default_display_currency() -> Currency {
    Currency::TRY
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub cash: Vec<CashItem>,
    #[serde(default = "default_display_currency")]
    pub currency: Currency,
    #[serde(default)]
    pub fx: FxConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Manual quotes, consulted before any live provider.
    #[serde(default)]
    pub prices: HashMap<String, PriceQuote>,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "kumbara", "kumbara")
            .context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    /// Directory holding the value history store.
    pub fn history_path(&self) -> Result<PathBuf> {
        let base = match &self.data_path {
            Some(custom_path) => PathBuf::from(custom_path),
            None => Self::project_dirs()?.data_dir().to_path_buf(),
        };
        Ok(base.join("history"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
