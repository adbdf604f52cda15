//! Rule-driven insights over the aggregated portfolio.
//!
//! Rules are independent and several can fire in one pass. The returned list
//! follows rule declaration order, not severity; callers that want the most
//! urgent item first should sort by [`Insight::priority`].

use crate::core::risk::{CategoryRatios, RiskAssessment};
use crate::core::trend::TrendSignal;
use anyhow::{Result, ensure};
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, warn};

pub const CRYPTO_CONCENTRATION_RATIO: f64 = 0.50;
pub const GOLD_HEDGE_RATIO: f64 = 0.05;
pub const CASH_SHORTAGE_RATIO: f64 = 0.05;
pub const CASH_EXCESS_RATIO: f64 = 0.60;
pub const HIGH_RISK_SCORE: i32 = 8;
pub const STRONG_DIVERSIFICATION: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Warning,
    Suggestion,
    Critical,
    Info,
    Success,
}

impl InsightKind {
    /// 1 is the most urgent.
    pub fn priority(&self) -> u8 {
        match self {
            InsightKind::Critical => 1,
            InsightKind::Warning => 2,
            InsightKind::Suggestion => 3,
            InsightKind::Info => 4,
            InsightKind::Success => 5,
        }
    }
}

impl Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InsightKind::Warning => "warning",
                InsightKind::Suggestion => "suggestion",
                InsightKind::Critical => "critical",
                InsightKind::Info => "info",
                InsightKind::Success => "success",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub priority: u8,
}

impl Insight {
    fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Insight {
            kind,
            title: title.into(),
            message: message.into(),
            priority: kind.priority(),
        }
    }
}

/// Everything the rules may look at.
#[derive(Debug, Clone, Copy)]
pub struct InsightContext {
    pub ratios: CategoryRatios,
    pub risk: RiskAssessment,
    pub trend: Option<TrendSignal>,
    pub holding_count: usize,
    pub total_value_try: f64,
}

impl InsightContext {
    fn is_empty_portfolio(&self) -> bool {
        self.holding_count == 0 && self.total_value_try <= 0.0
    }
}

type Rule = fn(&InsightContext) -> Result<Option<Insight>>;

const TREND_RULES: &[(&str, Rule)] = &[
    ("weekly_decline", weekly_decline),
    ("weekly_rise", weekly_rise),
];

const ALLOCATION_RULES: &[(&str, Rule)] = &[
    ("crypto_concentration", crypto_concentration),
    ("gold_hedge", gold_hedge),
    ("cash_shortage", cash_shortage),
    ("cash_excess", cash_excess),
    ("high_risk", high_risk),
    ("well_diversified", well_diversified),
];

/// Evaluates every rule. A rule that fails is logged and skipped so the
/// remaining insights are still produced.
pub fn generate(context: &InsightContext) -> Vec<Insight> {
    let mut insights = evaluate_rules(TREND_RULES, context);

    if context.is_empty_portfolio() {
        insights.push(Insight::new(
            InsightKind::Info,
            "Portföy boş",
            "Analiz için portföyünüze varlık veya nakit ekleyin.",
        ));
        return insights;
    }

    insights.extend(evaluate_rules(ALLOCATION_RULES, context));
    insights
}

fn evaluate_rules(rules: &[(&str, Rule)], context: &InsightContext) -> Vec<Insight> {
    rules
        .iter()
        .filter_map(|(name, rule)| match rule(context) {
            Ok(Some(insight)) => {
                debug!("Insight rule {name} fired: {}", insight.title);
                Some(insight)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Insight rule {name} failed, skipping: {e}");
                None
            }
        })
        .collect()
}

fn finite_ratio(value: f64, name: &str) -> Result<f64> {
    ensure!(value.is_finite(), "{name} ratio is not finite: {value}");
    Ok(value)
}

fn weekly_decline(context: &InsightContext) -> Result<Option<Insight>> {
    let Some(TrendSignal::Decline(pct)) = context.trend else {
        return Ok(None);
    };
    ensure!(pct.is_finite(), "weekly change is not finite: {pct}");
    Ok(Some(Insight::new(
        InsightKind::Warning,
        "Haftalık düşüş",
        format!(
            "Portföyünüz son bir haftada %{:.1} değer kaybetti. Dağılımınızı gözden geçirin.",
            pct.abs()
        ),
    )))
}

fn weekly_rise(context: &InsightContext) -> Result<Option<Insight>> {
    let Some(TrendSignal::Rise(pct)) = context.trend else {
        return Ok(None);
    };
    ensure!(pct.is_finite(), "weekly change is not finite: {pct}");
    Ok(Some(Insight::new(
        InsightKind::Suggestion,
        "Güçlü haftalık performans",
        format!(
            "Portföyünüz son bir haftada %{pct:.1} yükseldi. Kâr realizasyonunu değerlendirebilirsiniz."
        ),
    )))
}

fn crypto_concentration(context: &InsightContext) -> Result<Option<Insight>> {
    let crypto = finite_ratio(context.ratios.crypto, "crypto")?;
    Ok((crypto > CRYPTO_CONCENTRATION_RATIO).then(|| {
        Insight::new(
            InsightKind::Warning,
            "Kripto yoğunlaşması",
            format!(
                "Portföyünüzün %{:.0}'i kripto varlıklarda. Yüksek oynaklığa karşı dağılımı dengelemeyi düşünün.",
                crypto * 100.0
            ),
        )
    }))
}

fn gold_hedge(context: &InsightContext) -> Result<Option<Insight>> {
    let gold = finite_ratio(context.ratios.gold, "gold")?;
    Ok((gold < GOLD_HEDGE_RATIO).then(|| {
        Insight::new(
            InsightKind::Suggestion,
            "Altın payı düşük",
            format!(
                "Altın payınız %{:.1}. Enflasyon ve kur riskine karşı bir miktar altın korunma sağlayabilir.",
                gold * 100.0
            ),
        )
    }))
}

fn cash_shortage(context: &InsightContext) -> Result<Option<Insight>> {
    let cash = finite_ratio(context.ratios.cash, "cash")?;
    Ok((cash < CASH_SHORTAGE_RATIO).then(|| {
        Insight::new(
            InsightKind::Critical,
            "Yedek akçe yetersiz",
            format!(
                "Nakit oranınız %{:.1}. Beklenmedik harcamalar için likidite ayırmanız önerilir.",
                cash * 100.0
            ),
        )
    }))
}

fn cash_excess(context: &InsightContext) -> Result<Option<Insight>> {
    let cash = finite_ratio(context.ratios.cash, "cash")?;
    Ok((cash > CASH_EXCESS_RATIO).then(|| {
        Insight::new(
            InsightKind::Info,
            "Nakit fazlası",
            format!(
                "Portföyünüzün %{:.0}'i nakitte. Enflasyon karşısında değer kaybı riski var.",
                cash * 100.0
            ),
        )
    }))
}

fn high_risk(context: &InsightContext) -> Result<Option<Insight>> {
    Ok((context.risk.score >= HIGH_RISK_SCORE).then(|| {
        Insight::new(
            InsightKind::Warning,
            "Yüksek risk",
            format!(
                "Risk skorunuz {}/10. Daha dengeli bir dağılım oynaklığı azaltabilir.",
                context.risk.score
            ),
        )
    }))
}

fn well_diversified(context: &InsightContext) -> Result<Option<Insight>> {
    Ok(
        (context.risk.diversification >= STRONG_DIVERSIFICATION).then(|| {
            Insight::new(
                InsightKind::Success,
                "İyi çeşitlendirilmiş",
                format!(
                    "Çeşitlendirme skorunuz {}/10. Varlıklarınız farklı kategorilere dağılmış.",
                    context.risk.diversification
                ),
            )
        }),
    )
}
