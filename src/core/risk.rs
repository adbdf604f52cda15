//! Risk and diversification scoring from category shares.

use crate::core::aggregate::AggregateResult;
use crate::core::category::Category;
use serde::Serialize;
use std::fmt::Display;

pub const MIN_RISK_SCORE: i32 = 1;
pub const MAX_RISK_SCORE: i32 = 10;

/// Category shares as fractions of total portfolio value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CategoryRatios {
    pub crypto: f64,
    /// Domestic equities plus US stocks/ETFs.
    pub stock: f64,
    pub gold: f64,
    pub cash: f64,
}

impl CategoryRatios {
    pub fn from_aggregate(aggregate: &AggregateResult) -> Self {
        CategoryRatios {
            crypto: aggregate.ratio(&Category::Crypto),
            stock: aggregate.ratio_where(Category::is_equity),
            gold: aggregate.ratio(&Category::Gold),
            cash: aggregate.ratio(&Category::Reserve),
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.crypto, self.stock, self.gold, self.cash]
            .iter()
            .all(|r| r.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    /// 1 (lowest) to 10 (highest).
    pub score: i32,
    /// One of 3, 6, 8 or 10.
    pub diversification: i32,
}

impl RiskAssessment {
    pub fn band(&self) -> RiskBand {
        RiskBand::from_score(self.score)
    }
}

pub fn assess(ratios: &CategoryRatios, category_count: usize) -> RiskAssessment {
    RiskAssessment {
        score: risk_score(ratios),
        diversification: diversification_score(category_count),
    }
}

pub fn risk_score(ratios: &CategoryRatios) -> i32 {
    let mut score = 3;

    if ratios.crypto > 0.50 {
        score += 5;
    } else if ratios.crypto > 0.25 {
        score += 3;
    }
    if ratios.stock > 0.60 {
        score += 2;
    }
    if ratios.gold > 0.20 {
        score -= 1;
    }
    if ratios.cash > 0.25 {
        score -= 2;
    }

    score.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE)
}

pub fn diversification_score(category_count: usize) -> i32 {
    match category_count {
        5.. => 10,
        4 => 8,
        3 => 6,
        _ => 3,
    }
}

/// Presentation band for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: i32) -> Self {
        match score {
            8.. => RiskBand::High,
            5..=7 => RiskBand::Medium,
            _ => RiskBand::Low,
        }
    }
}

impl Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RiskBand::Low => "Düşük Risk",
                RiskBand::Medium => "Orta Risk",
                RiskBand::High => "Yüksek Risk",
            }
        )
    }
}
