//! Folds holdings and cash into portfolio totals and a category breakdown.
use crate::core::category::{self, Category};
use crate::core::currency::{self, Currency, FxRate};
use crate::core::holding::{AssetType, CashItem, Holding};
use crate::core::price::PriceSnapshot;
use crate::core::valuation::{self, Valuation};
use std::collections::BTreeMap;
use tracing::debug;

/// Calculated value of a single holding in both reporting currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingValue {
    pub instrument_id: String,
    pub asset_type: AssetType,
    pub category: Category,
    pub currency: Currency,
    pub amount: f64,
    pub effective_price: f64,
    pub value_try: f64,
    pub value_usd: f64,
    pub cost_try: f64,
    pub cost_usd: f64,
    pub profit_try: f64,
    /// P/L percent in the holding's own currency. `None` without a cost basis.
    pub profit_pct: Option<f64>,
    /// `None` when no live quote was used.
    pub daily_change_percent: Option<f64>,
}

/// Best or worst holding by P/L percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct Performer {
    pub instrument_id: String,
    pub profit_pct: f64,
    pub profit_try: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateResult {
    pub total_value_try: f64,
    pub total_value_usd: f64,
    pub total_cost_basis_try: f64,
    pub total_cost_basis_usd: f64,
    pub daily_profit_try: f64,
    /// Sum of plain cash and money-market positions, in TRY.
    pub cash_try: f64,
    pub category_values: BTreeMap<Category, f64>,
    pub holdings: Vec<HoldingValue>,
    pub best_performer: Option<Performer>,
    pub worst_performer: Option<Performer>,
}

impl AggregateResult {
    pub fn profit_try(&self) -> f64 {
        self.total_value_try - self.total_cost_basis_try
    }

    pub fn profit_pct(&self) -> Option<f64> {
        (self.total_cost_basis_try != 0.0)
            .then(|| self.profit_try() / self.total_cost_basis_try * 100.0)
    }

    /// Fraction of the total value held in `category`, 0 for an empty portfolio.
    pub fn ratio(&self, category: &Category) -> f64 {
        self.ratio_where(|c| c == category)
    }

    pub fn ratio_where(&self, predicate: impl Fn(&Category) -> bool) -> f64 {
        if self.total_value_try <= 0.0 {
            return 0.0;
        }
        // An empty f64 `sum()` is -0.0, so fold from +0.0.
        let value = self
            .category_values
            .iter()
            .filter(|(c, _)| predicate(c))
            .fold(0.0, |acc, (_, v)| acc + v);
        value / self.total_value_try
    }

    /// Number of categories holding a positive value.
    pub fn category_count(&self) -> usize {
        self.category_values.values().filter(|v| **v > 0.0).count()
    }
}

/// Aggregates all positions of one pass. Pure function of its inputs.
pub fn aggregate(
    holdings: &[Holding],
    cash: &[CashItem],
    prices: &PriceSnapshot,
    fx_rate: FxRate,
) -> AggregateResult {
    let mut result = AggregateResult::default();

    for holding in holdings {
        let valuation = valuation::value_holding(holding, prices, fx_rate);
        let holding_value = to_holding_value(holding, &valuation, prices, fx_rate);

        result.total_value_try += holding_value.value_try;
        result.total_value_usd += holding_value.value_usd;
        result.total_cost_basis_try += holding_value.cost_try;
        result.total_cost_basis_usd += holding_value.cost_usd;
        if let Some(change) = holding_value.daily_change_percent {
            result.daily_profit_try += holding_value.value_try * change / 100.0;
        }
        *result
            .category_values
            .entry(holding_value.category.clone())
            .or_insert(0.0) += holding_value.value_try;

        track_performers(&mut result, &holding_value);
        result.holdings.push(holding_value);
    }

    for item in cash {
        add_cash(&mut result, item, prices, fx_rate);
    }
    if result.cash_try != 0.0 {
        *result.category_values.entry(Category::Reserve).or_insert(0.0) += result.cash_try;
    }

    debug!(
        "Aggregated {} holdings and {} cash items: {:.2} TRY / {:.2} USD",
        holdings.len(),
        cash.len(),
        result.total_value_try,
        result.total_value_usd
    );
    result
}

fn to_holding_value(
    holding: &Holding,
    valuation: &Valuation,
    prices: &PriceSnapshot,
    fx_rate: FxRate,
) -> HoldingValue {
    let category = category::classify(holding);
    let value_try =
        currency::convert(valuation.current_value, holding.currency, Currency::TRY, fx_rate);
    let value_usd =
        currency::convert(valuation.current_value, holding.currency, Currency::USD, fx_rate);
    let cost_try = valuation::cost_basis_in(holding, valuation, Currency::TRY, fx_rate);
    let cost_usd = valuation::cost_basis_in(holding, valuation, Currency::USD, fx_rate);

    // Custom prices and BES accounts are not market quotes.
    let daily_change_percent = match (holding.custom_current_price, holding.asset_type()) {
        (None, t) if t != AssetType::Bes => prices
            .get(&holding.instrument_id)
            .filter(|q| q.price > 0.0)
            .map(|q| q.daily_change_percent),
        _ => None,
    };

    debug!(
        "Valued {} ({}) as {} at {:.2} TRY, cost {:.2} TRY",
        holding.instrument_id,
        holding.asset_type(),
        category,
        value_try,
        cost_try
    );

    HoldingValue {
        instrument_id: holding.instrument_id.clone(),
        asset_type: holding.asset_type(),
        category,
        currency: holding.currency,
        amount: holding.amount,
        effective_price: valuation.effective_price,
        value_try,
        value_usd,
        cost_try,
        cost_usd,
        profit_try: value_try - cost_try,
        profit_pct: valuation.profit_pct(),
        daily_change_percent,
    }
}

// Strict comparisons: on ties the first holding seen keeps the slot.
fn track_performers(result: &mut AggregateResult, holding: &HoldingValue) {
    let Some(pct) = holding.profit_pct else {
        return;
    };
    let performer = || Performer {
        instrument_id: holding.instrument_id.clone(),
        profit_pct: pct,
        profit_try: holding.profit_try,
    };

    if result.best_performer.as_ref().is_none_or(|b| pct > b.profit_pct) {
        result.best_performer = Some(performer());
    }
    if result.worst_performer.as_ref().is_none_or(|w| pct < w.profit_pct) {
        result.worst_performer = Some(performer());
    }
}

fn add_cash(result: &mut AggregateResult, item: &CashItem, prices: &PriceSnapshot, fx_rate: FxRate) {
    let (value_try, cost_try) = match item {
        CashItem::PlainCash { amount, currency } => {
            let value = currency::convert(*amount, *currency, Currency::TRY, fx_rate);
            (value, value)
        }
        CashItem::MoneyMarketFund {
            instrument_id,
            units,
            average_cost,
        } => {
            let cost = units * average_cost;
            match prices.get(instrument_id).filter(|q| q.price > 0.0) {
                Some(quote) => {
                    let current = units * quote.price;
                    let value = cost + (current - cost);
                    result.daily_profit_try += value * quote.daily_change_percent / 100.0;
                    (value, cost)
                }
                None => {
                    debug!("No live price for money market fund {instrument_id}, using cost");
                    (cost, cost)
                }
            }
        }
    };

    result.cash_try += value_try;
    result.total_value_try += value_try;
    result.total_value_usd += currency::convert(value_try, Currency::TRY, Currency::USD, fx_rate);
    result.total_cost_basis_try += cost_try;
    result.total_cost_basis_usd += currency::convert(cost_try, Currency::TRY, Currency::USD, fx_rate);
}
