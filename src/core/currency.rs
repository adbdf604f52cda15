//! Currency conversion abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Rate used when no usable TRY/USD quote is available.
pub const DEFAULT_TRY_PER_USD: f64 = 35.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Currency {
    #[serde(alias = "try")]
    TRY,
    #[serde(alias = "usd")]
    USD,
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Currency::TRY => "TRY",
                Currency::USD => "USD",
            }
        )
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRY" | "TL" => Ok(Currency::TRY),
            "USD" => Ok(Currency::USD),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

/// TRY per 1 USD. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FxRate(f64);

impl FxRate {
    /// Builds a rate, falling back to [`DEFAULT_TRY_PER_USD`] for zero,
    /// negative or non-finite input.
    pub fn new(try_per_usd: f64) -> Self {
        Self::with_fallback(try_per_usd, DEFAULT_TRY_PER_USD)
    }

    /// Builds a rate, falling back to `fallback` (or the default when the
    /// fallback itself is unusable).
    pub fn with_fallback(try_per_usd: f64, fallback: f64) -> Self {
        if is_usable(try_per_usd) {
            FxRate(try_per_usd)
        } else if is_usable(fallback) {
            FxRate(fallback)
        } else {
            FxRate(DEFAULT_TRY_PER_USD)
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for FxRate {
    fn default() -> Self {
        FxRate(DEFAULT_TRY_PER_USD)
    }
}

fn is_usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Converts `value` between the two supported currencies.
pub fn convert(value: f64, from: Currency, to: Currency, rate: FxRate) -> f64 {
    match (from, to) {
        (Currency::TRY, Currency::USD) => value / rate.value(),
        (Currency::USD, Currency::TRY) => value * rate.value(),
        _ => value,
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}
