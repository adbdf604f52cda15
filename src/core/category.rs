//! Classification of holdings into distribution categories.

use crate::core::currency::Currency;
use crate::core::holding::{AssetType, Holding};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const CRYPTO_TICKERS: &[&str] = &[
    "BTC", "ETH", "BNB", "SOL", "XRP", "ADA", "AVAX", "DOGE", "DOT", "TRX", "LINK", "LTC",
    "MATIC", "POL", "SHIB", "USDT", "USDC", "ATOM", "XLM", "NEAR", "APT", "ARB", "OP",
];
const GOLD_TOKENS: &[&str] = &["GRAM", "CEYREK", "YARIM", "TAM", "ONS", "GOLD"];
const SILVER_TOKENS: &[&str] = &["GUMUS", "SILVER", "XAG"];
const FIAT_CODES: &[&str] = &[
    "USD", "EUR", "GBP", "CHF", "JPY", "TRY", "CAD", "AUD", "SAR", "AED", "RUB", "CNY",
    "SEK", "NOK", "DKK", "KWD", "QAR",
];
const US_ETFS: &[&str] = &[
    "SPY", "QQQ", "VOO", "VTI", "IVV", "SCHD", "VYM", "VEA", "VWO", "VXUS", "BND", "GLD",
    "SLV", "ARKK", "TQQQ", "DIA", "IWM", "VGT", "XLK", "JEPI",
];
const BIST_SUFFIX: &str = ".IS";
const PENSION_PREFIX: &str = "BES";

/// Portfolio distribution bucket. Labels are the user-facing Turkish names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    Custom(String),
    Crypto,
    Gold,
    Silver,
    BistEquity,
    Pension,
    Fund,
    Forex,
    UsEtf,
    Other,
    /// Reserve cash ("Yedek Akçe"). Only produced by the aggregator.
    Reserve,
}

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Category::Custom(label) => label,
            Category::Crypto => "Kripto",
            Category::Gold => "Altın",
            Category::Silver => "Gümüş",
            Category::BistEquity => "Hisse (BIST)",
            Category::Pension => "BES",
            Category::Fund => "Fon",
            Category::Forex => "Döviz",
            Category::UsEtf => "ABD ETF",
            Category::Other => "Diğer",
            Category::Reserve => "Yedek Akçe",
        }
    }

    /// Built-in category whose label matches `label`, ignoring case and
    /// surrounding whitespace. Any other non-blank label becomes `Custom`.
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let wanted = label.to_lowercase();
        let builtin = [
            Category::Crypto,
            Category::Gold,
            Category::Silver,
            Category::BistEquity,
            Category::Pension,
            Category::Fund,
            Category::Forex,
            Category::UsEtf,
            Category::Other,
            Category::Reserve,
        ]
        .into_iter()
        .find(|c| c.label().to_lowercase() == wanted);
        Some(builtin.unwrap_or_else(|| Category::Custom(label.to_string())))
    }

    /// Counted as equity exposure by the risk scorer.
    pub fn is_equity(&self) -> bool {
        matches!(self, Category::BistEquity | Category::UsEtf)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

type Rule = fn(&Holding, &str) -> Option<Category>;

/// Ordered classification chain. The first rule returning a category wins.
const CATEGORY_RULES: &[Rule] = &[
    custom_rule,
    crypto_rule,
    gold_rule,
    silver_rule,
    bist_rule,
    pension_rule,
    fund_rule,
    forex_rule,
    us_etf_rule,
];

/// Maps a holding to exactly one category.
pub fn classify(holding: &Holding) -> Category {
    let id = holding.instrument_id.trim().to_uppercase();
    CATEGORY_RULES
        .iter()
        .find_map(|rule| rule(holding, &id))
        .unwrap_or(Category::Other)
}

fn custom_rule(holding: &Holding, _id: &str) -> Option<Category> {
    holding
        .custom_category
        .as_deref()
        .and_then(Category::from_label)
}

fn crypto_rule(holding: &Holding, id: &str) -> Option<Category> {
    (holding.asset_type() == AssetType::Crypto || is_crypto_ticker(id)).then_some(Category::Crypto)
}

fn gold_rule(holding: &Holding, id: &str) -> Option<Category> {
    (holding.asset_type() == AssetType::Gold || contains_any(id, GOLD_TOKENS))
        .then_some(Category::Gold)
}

fn silver_rule(holding: &Holding, id: &str) -> Option<Category> {
    (holding.asset_type() == AssetType::Silver || contains_any(id, SILVER_TOKENS))
        .then_some(Category::Silver)
}

fn bist_rule(_holding: &Holding, id: &str) -> Option<Category> {
    id.ends_with(BIST_SUFFIX).then_some(Category::BistEquity)
}

fn pension_rule(holding: &Holding, id: &str) -> Option<Category> {
    (holding.asset_type() == AssetType::Bes || id.starts_with(PENSION_PREFIX))
        .then_some(Category::Pension)
}

fn fund_rule(holding: &Holding, id: &str) -> Option<Category> {
    let fund_code =
        id.len() == 3 && id.chars().all(|c| c.is_ascii_alphabetic()) && !FIAT_CODES.contains(&id);
    (holding.asset_type() == AssetType::Fund || fund_code).then_some(Category::Fund)
}

fn forex_rule(holding: &Holding, id: &str) -> Option<Category> {
    (holding.asset_type() == AssetType::Forex || FIAT_CODES.contains(&id))
        .then_some(Category::Forex)
}

fn us_etf_rule(holding: &Holding, id: &str) -> Option<Category> {
    (holding.currency == Currency::USD
        && (holding.asset_type() == AssetType::Stock || US_ETFS.contains(&id)))
    .then_some(Category::UsEtf)
}

fn is_crypto_ticker(id: &str) -> bool {
    let base = id
        .strip_suffix("-USD")
        .or_else(|| id.strip_suffix("USDT").filter(|b| !b.is_empty()))
        .unwrap_or(id);
    CRYPTO_TICKERS.contains(&base)
}

fn contains_any(id: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| id.contains(token))
}
