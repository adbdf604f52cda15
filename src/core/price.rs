//! Pricing abstractions and core types

use crate::core::holding::AssetType;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single live quote. `price` is in the instrument's quote currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    #[serde(default)]
    pub daily_change_percent: f64,
}

/// Quotes keyed by instrument id for one aggregation pass.
///
/// Lookups are exact first and then case-insensitive. A missing entry means
/// "no price", which the valuation treats as zero contribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSnapshot {
    quotes: HashMap<String, PriceQuote>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instrument_id: impl Into<String>, quote: PriceQuote) {
        self.quotes.insert(instrument_id.into(), quote);
    }

    pub fn get(&self, instrument_id: &str) -> Option<&PriceQuote> {
        self.quotes.get(instrument_id).or_else(|| {
            self.quotes
                .iter()
                .find(|(id, _)| id.eq_ignore_ascii_case(instrument_id))
                .map(|(_, quote)| quote)
        })
    }

    /// Returns the quoted price, ignoring zero or non-finite quotes.
    pub fn price(&self, instrument_id: &str) -> Option<f64> {
        self.get(instrument_id)
            .map(|q| q.price)
            .filter(|p| p.is_finite() && *p > 0.0)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<(String, PriceQuote)> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, PriceQuote)>>(iter: I) -> Self {
        PriceSnapshot {
            quotes: iter.into_iter().collect(),
        }
    }
}

/// What a provider needs to know to look up one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteRequest {
    pub instrument_id: String,
    pub asset_type: AssetType,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<PriceQuote>;
}
