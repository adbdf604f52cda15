//! Single entry point of the valuation and insight pipeline.

use crate::core::aggregate::{self, AggregateResult};
use crate::core::currency::FxRate;
use crate::core::holding::{CashItem, Holding};
use crate::core::insight::{self, Insight, InsightContext};
use crate::core::price::PriceSnapshot;
use crate::core::risk::{self, CategoryRatios, RiskAssessment};
use crate::core::trend::{self, HistoryPoint, TrendSignal};
use tracing::instrument;

/// A consistent snapshot of everything one pass needs.
#[derive(Debug, Clone, Default)]
pub struct PortfolioInput {
    pub holdings: Vec<Holding>,
    pub cash: Vec<CashItem>,
    pub prices: PriceSnapshot,
    pub fx_rate: FxRate,
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone)]
pub struct PortfolioReport {
    /// Rate the pass was valued at.
    pub fx_rate: FxRate,
    pub aggregate: AggregateResult,
    pub ratios: CategoryRatios,
    pub risk: RiskAssessment,
    pub trend: Option<TrendSignal>,
    pub insights: Vec<Insight>,
}

/// Runs valuation, classification, aggregation, scoring, trend analysis and
/// insight generation. Pure: identical input yields identical output.
#[instrument(
    name = "EvaluatePortfolio",
    skip(input),
    fields(holdings = input.holdings.len(), cash = input.cash.len())
)]
pub fn evaluate(input: &PortfolioInput) -> PortfolioReport {
    let aggregate = aggregate::aggregate(&input.holdings, &input.cash, &input.prices, input.fx_rate);
    let ratios = CategoryRatios::from_aggregate(&aggregate);
    let risk = risk::assess(&ratios, aggregate.category_count());
    let trend = trend::analyze(&input.history);

    let insights = insight::generate(&InsightContext {
        ratios,
        risk,
        trend,
        holding_count: input.holdings.len(),
        total_value_try: aggregate.total_value_try,
    });

    PortfolioReport {
        fx_rate: input.fx_rate,
        aggregate,
        ratios,
        risk,
        trend,
        insights,
    }
}
