//! Per-holding valuation.

use crate::core::currency::{self, Currency, FxRate};
use crate::core::holding::{AssetKind, Holding};
use crate::core::price::PriceSnapshot;
use tracing::debug;

/// Value and cost of one holding, both in the holding's own currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub current_value: f64,
    pub cost_basis: f64,
    /// Per-unit price actually used. For BES accounts this is the total value.
    pub effective_price: f64,
}

impl Valuation {
    pub fn profit(&self) -> f64 {
        self.current_value - self.cost_basis
    }

    /// Unrealized P/L in percent, `None` when there is no cost to compare to.
    pub fn profit_pct(&self) -> Option<f64> {
        (self.cost_basis != 0.0).then(|| self.profit() / self.cost_basis * 100.0)
    }
}

/// Values a holding against a price snapshot.
///
/// A holding without a custom price and without a resolvable quote is worth
/// zero; that is a policy, not an error.
pub fn value_holding(holding: &Holding, prices: &PriceSnapshot, fx_rate: FxRate) -> Valuation {
    if let AssetKind::Bes(bes) = &holding.kind {
        let total = bes.total();
        return Valuation {
            current_value: total,
            cost_basis: bes.principal,
            effective_price: total,
        };
    }

    let effective_price = effective_price(holding, prices, fx_rate);
    Valuation {
        current_value: holding.amount * effective_price,
        cost_basis: holding.amount * holding.average_cost,
        effective_price,
    }
}

fn effective_price(holding: &Holding, prices: &PriceSnapshot, fx_rate: FxRate) -> f64 {
    if let Some(custom) = holding.custom_current_price {
        return custom;
    }

    match (prices.price(&holding.instrument_id), &holding.kind) {
        // Crypto is always quoted in USD.
        (Some(usd_price), AssetKind::Crypto) if holding.currency == Currency::TRY => {
            let converted = usd_price * fx_rate.value();
            debug!(
                "Converted {} quote {usd_price} USD to {converted} TRY at rate {}",
                holding.instrument_id,
                fx_rate.value()
            );
            converted
        }
        (Some(price), _) => price,
        (None, _) => {
            debug!("No price available for {}", holding.instrument_id);
            0.0
        }
    }
}

/// Cost basis of a holding expressed in `target`.
///
/// A recorded original cost in the target currency wins over converting at
/// today's rate, which would fold FX drift into the P/L percentage.
pub fn cost_basis_in(
    holding: &Holding,
    valuation: &Valuation,
    target: Currency,
    fx_rate: FxRate,
) -> f64 {
    if holding.currency == target {
        return valuation.cost_basis;
    }
    holding
        .original_cost_in(target)
        .unwrap_or_else(|| currency::convert(valuation.cost_basis, holding.currency, target, fx_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::holding::BesBreakdown;
    use crate::core::price::PriceQuote;

    fn snapshot(id: &str, price: f64) -> PriceSnapshot {
        let mut snapshot = PriceSnapshot::new();
        snapshot.insert(
            id,
            PriceQuote {
                price,
                daily_change_percent: 0.0,
            },
        );
        snapshot
    }

    #[test]
    fn test_plain_stock() {
        let holding = Holding::new("THYAO.IS", AssetKind::Stock, Currency::TRY, 100.0, 10.0);
        let valuation = value_holding(&holding, &snapshot("THYAO.IS", 15.0), FxRate::new(30.0));

        assert_eq!(valuation.current_value, 1500.0);
        assert_eq!(valuation.cost_basis, 1000.0);
        assert_eq!(valuation.effective_price, 15.0);
        assert_eq!(valuation.profit(), 500.0);
        assert_eq!(valuation.profit_pct(), Some(50.0));
    }

    #[test]
    fn test_crypto_in_try_uses_fx_rate() {
        let holding = Holding::new("BTC", AssetKind::Crypto, Currency::TRY, 0.01, 1_000_000.0);
        let valuation = value_holding(&holding, &snapshot("BTC", 60_000.0), FxRate::new(32.0));

        assert_eq!(valuation.effective_price, 1_920_000.0);
        assert!((valuation.current_value - 19_200.0).abs() < 1e-9);
        assert!((valuation.cost_basis - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_crypto_in_usd_is_not_converted() {
        let holding = Holding::new("ETH", AssetKind::Crypto, Currency::USD, 2.0, 2000.0);
        let valuation = value_holding(&holding, &snapshot("ETH", 3000.0), FxRate::new(32.0));

        assert_eq!(valuation.effective_price, 3000.0);
        assert_eq!(valuation.current_value, 6000.0);
    }

    #[test]
    fn test_custom_price_overrides_quote() {
        let mut holding = Holding::new("BTC", AssetKind::Crypto, Currency::TRY, 1.0, 100.0);
        holding.custom_current_price = Some(250.0);
        let valuation = value_holding(&holding, &snapshot("BTC", 60_000.0), FxRate::new(32.0));

        assert_eq!(valuation.effective_price, 250.0);
        assert_eq!(valuation.current_value, 250.0);
    }

    #[test]
    fn test_bes_components_override_units() {
        let mut holding = Holding::new(
            "BES-1",
            AssetKind::Bes(BesBreakdown {
                principal: 50_000.0,
                state_contrib: 15_000.0,
                state_contrib_yield: 3_000.0,
                principal_yield: 12_000.0,
            }),
            Currency::TRY,
            999.0,
            999.0,
        );
        holding.custom_current_price = Some(1.0);
        let valuation = value_holding(&holding, &PriceSnapshot::new(), FxRate::new(32.0));

        assert_eq!(valuation.current_value, 80_000.0);
        assert_eq!(valuation.cost_basis, 50_000.0);
        assert_eq!(valuation.effective_price, 80_000.0);
        assert_eq!(valuation.profit_pct(), Some(60.0));
    }

    #[test]
    fn test_missing_price_values_at_zero() {
        let holding = Holding::new("ASELS.IS", AssetKind::Stock, Currency::TRY, 10.0, 50.0);
        let valuation = value_holding(&holding, &PriceSnapshot::new(), FxRate::new(32.0));

        assert_eq!(valuation.current_value, 0.0);
        assert_eq!(valuation.effective_price, 0.0);
        assert_eq!(valuation.cost_basis, 500.0);
    }

    #[test]
    fn test_zero_cost_has_no_percentage() {
        let holding = Holding::new("GIFT", AssetKind::CustomAsset, Currency::TRY, 1.0, 0.0);
        let valuation = value_holding(&holding, &snapshot("GIFT", 10.0), FxRate::new(32.0));
        assert_eq!(valuation.profit_pct(), None);
    }

    #[test]
    fn test_cross_currency_cost_prefers_original() {
        let mut holding = Holding::new("AAPL", AssetKind::Stock, Currency::USD, 10.0, 100.0);
        let rate = FxRate::new(35.0);
        let valuation = value_holding(&holding, &snapshot("AAPL", 120.0), rate);

        assert_eq!(cost_basis_in(&holding, &valuation, Currency::USD, rate), 1000.0);
        assert_eq!(cost_basis_in(&holding, &valuation, Currency::TRY, rate), 35_000.0);

        holding.original_cost_try = Some(28_000.0);
        assert_eq!(cost_basis_in(&holding, &valuation, Currency::TRY, rate), 28_000.0);
        // A TRY figure never affects the native USD cost.
        assert_eq!(cost_basis_in(&holding, &valuation, Currency::USD, rate), 1000.0);
    }
}
