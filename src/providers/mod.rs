pub mod tefas;
pub mod util;
pub mod yahoo_finance;

use crate::core::config::FxConfig;
use crate::core::currency::{CurrencyRateProvider, FxRate};
use crate::core::holding::{AssetKind, AssetType, CashItem, Holding};
use crate::core::price::{PriceProvider, PriceQuote, PriceSnapshot, QuoteRequest};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Quotes taken verbatim from the `prices:` section of the config.
#[derive(Debug, Default)]
pub struct StaticPriceProvider {
    quotes: HashMap<String, PriceQuote>,
}

impl StaticPriceProvider {
    pub fn new(quotes: &HashMap<String, PriceQuote>) -> Self {
        StaticPriceProvider {
            quotes: quotes
                .iter()
                .map(|(id, quote)| (id.to_uppercase(), *quote))
                .collect(),
        }
    }
}

#[async_trait]
impl PriceProvider for StaticPriceProvider {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<PriceQuote> {
        self.quotes
            .get(&request.instrument_id.to_uppercase())
            .copied()
            .ok_or_else(|| anyhow!("No static price for {}", request.instrument_id))
    }
}

/// Instruments that need a market quote, deduplicated in first-seen order.
///
/// BES accounts and holdings with a custom price never consult the snapshot.
/// Money-market cash is looked up as a fund.
pub fn quote_requests(holdings: &[Holding], cash: &[CashItem]) -> Vec<QuoteRequest> {
    let from_holdings = holdings
        .iter()
        .filter(|h| h.custom_current_price.is_none() && !matches!(h.kind, AssetKind::Bes(_)))
        .map(|h| QuoteRequest {
            instrument_id: h.instrument_id.clone(),
            asset_type: h.asset_type(),
        });
    let from_cash = cash.iter().filter_map(|item| match item {
        CashItem::MoneyMarketFund { instrument_id, .. } => Some(QuoteRequest {
            instrument_id: instrument_id.clone(),
            asset_type: AssetType::Fund,
        }),
        CashItem::PlainCash { .. } => None,
    });

    let mut seen = HashSet::new();
    from_holdings
        .chain(from_cash)
        .filter(|r| seen.insert(r.instrument_id.to_uppercase()))
        .collect()
}

async fn first_quote(
    request: &QuoteRequest,
    providers: &[&dyn PriceProvider],
) -> Option<PriceQuote> {
    let mut errors = Vec::new();
    for provider in providers {
        match provider.fetch_quote(request).await {
            Ok(quote) => return Some(quote),
            Err(e) => errors.push(e.to_string()),
        }
    }
    warn!(
        instrument = %request.instrument_id,
        "No price available: {}",
        errors.join("; ")
    );
    None
}

/// Fetches all requests concurrently, trying `providers` in order for each.
///
/// A request that no provider can answer is left out of the snapshot.
pub async fn resolve_snapshot(
    requests: &[QuoteRequest],
    providers: &[&dyn PriceProvider],
    on_progress: &(dyn Fn() + Sync),
) -> PriceSnapshot {
    let quote_futures = requests.iter().map(|request| async move {
        let quote = first_quote(request, providers).await;
        on_progress();
        quote.map(|q| (request.instrument_id.clone(), q))
    });

    let snapshot: PriceSnapshot = join_all(quote_futures).await.into_iter().flatten().collect();
    debug!("Resolved {} of {} quotes", snapshot.len(), requests.len());
    snapshot
}

/// TRY per USD for this pass. A pinned rate wins; fetch errors use the fallback.
pub async fn resolve_fx_rate(
    provider: Option<&dyn CurrencyRateProvider>,
    config: &FxConfig,
) -> FxRate {
    if let Some(rate) = config.rate {
        debug!("Using pinned USD/TRY rate {}", rate);
        return FxRate::with_fallback(rate, config.fallback_rate);
    }

    let Some(provider) = provider else {
        return FxRate::new(config.fallback_rate);
    };
    match provider.get_rate("USD", "TRY").await {
        Ok(rate) => FxRate::with_fallback(rate, config.fallback_rate),
        Err(e) => {
            warn!(
                "Using fallback USD/TRY rate {}: {:#}",
                config.fallback_rate, e
            );
            FxRate::new(config.fallback_rate)
        }
    }
}
