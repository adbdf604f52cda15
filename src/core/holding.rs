//! Holding and cash records as supplied by the caller.

use crate::core::currency::Currency;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The four additive components of a pension (BES) account.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BesBreakdown {
    pub principal: f64,
    #[serde(default)]
    pub state_contrib: f64,
    #[serde(default)]
    pub state_contrib_yield: f64,
    #[serde(default)]
    pub principal_yield: f64,
}

impl BesBreakdown {
    pub fn total(&self) -> f64 {
        self.principal + self.state_contrib + self.state_contrib_yield + self.principal_yield
    }
}

/// Asset kind, carrying the fields only that kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetKind {
    Stock,
    Crypto,
    Gold,
    Silver,
    Forex,
    Fund,
    Bes(BesBreakdown),
    #[serde(alias = "customAsset")]
    CustomAsset,
}

/// Data-less tag of [`AssetKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Stock,
    Crypto,
    Gold,
    Silver,
    Forex,
    Fund,
    Bes,
    CustomAsset,
}

impl AssetKind {
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetKind::Stock => AssetType::Stock,
            AssetKind::Crypto => AssetType::Crypto,
            AssetKind::Gold => AssetType::Gold,
            AssetKind::Silver => AssetType::Silver,
            AssetKind::Forex => AssetType::Forex,
            AssetKind::Fund => AssetType::Fund,
            AssetKind::Bes(_) => AssetType::Bes,
            AssetKind::CustomAsset => AssetType::CustomAsset,
        }
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AssetType::Stock => "stock",
                AssetType::Crypto => "crypto",
                AssetType::Gold => "gold",
                AssetType::Silver => "silver",
                AssetType::Forex => "forex",
                AssetType::Fund => "fund",
                AssetType::Bes => "bes",
                AssetType::CustomAsset => "custom_asset",
            }
        )
    }
}

fn default_currency() -> Currency {
    Currency::TRY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub instrument_id: String,
    #[serde(flatten)]
    pub kind: AssetKind,
    #[serde(default = "default_currency")]
    pub currency: Currency,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub average_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_category: Option<String>,
    /// Total cost in USD at purchase time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_cost_usd: Option<f64>,
    /// Total cost in TRY at purchase time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_cost_try: Option<f64>,
}

impl Holding {
    /// A plain holding with no overrides.
    pub fn new(
        instrument_id: impl Into<String>,
        kind: AssetKind,
        currency: Currency,
        amount: f64,
        average_cost: f64,
    ) -> Self {
        Holding {
            instrument_id: instrument_id.into(),
            kind,
            currency,
            amount,
            average_cost,
            custom_current_price: None,
            custom_category: None,
            original_cost_usd: None,
            original_cost_try: None,
        }
    }

    pub fn asset_type(&self) -> AssetType {
        self.kind.asset_type()
    }

    /// Original total cost in `currency`, if it was recorded.
    pub fn original_cost_in(&self, currency: Currency) -> Option<f64> {
        match currency {
            Currency::USD => self.original_cost_usd,
            Currency::TRY => self.original_cost_try,
        }
    }
}

/// Non-invested cash, either plain balance or a money-market fund position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CashItem {
    PlainCash {
        amount: f64,
        #[serde(default = "default_currency")]
        currency: Currency,
    },
    MoneyMarketFund {
        instrument_id: String,
        units: f64,
        average_cost: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holding_deserialization() {
        let yaml_str = r#"
- instrument_id: "THYAO.IS"
  type: stock
  amount: 100
  average_cost: 250.5
- instrument_id: "BTC"
  type: crypto
  currency: USD
  amount: 0.05
  average_cost: 42000
  original_cost_try: 61000
- instrument_id: "BES-AVIVA"
  type: bes
  principal: 50000
  state_contrib: 15000
  state_contrib_yield: 3000
  principal_yield: 12000
- instrument_id: "Arsa"
  type: custom_asset
  amount: 1
  average_cost: 400000
  custom_current_price: 650000
  custom_category: "Gayrimenkul"
"#;

        let holdings: Vec<Holding> = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(holdings.len(), 4);

        assert_eq!(holdings[0].kind, AssetKind::Stock);
        assert_eq!(holdings[0].currency, Currency::TRY);
        assert_eq!(holdings[0].amount, 100.0);

        assert_eq!(holdings[1].asset_type(), AssetType::Crypto);
        assert_eq!(holdings[1].currency, Currency::USD);
        assert_eq!(holdings[1].original_cost_in(Currency::TRY), Some(61000.0));
        assert_eq!(holdings[1].original_cost_in(Currency::USD), None);

        if let AssetKind::Bes(bes) = &holdings[2].kind {
            assert_eq!(bes.principal, 50000.0);
            assert_eq!(bes.total(), 80000.0);
        } else {
            panic!("Expected a BES holding");
        }
        assert_eq!(holdings[2].amount, 0.0);

        assert_eq!(holdings[3].asset_type(), AssetType::CustomAsset);
        assert_eq!(holdings[3].custom_current_price, Some(650000.0));
        assert_eq!(holdings[3].custom_category.as_deref(), Some("Gayrimenkul"));
    }

    #[test]
    fn test_cash_deserialization() {
        let yaml_str = r#"
- kind: plain_cash
  amount: 25000
- kind: plain_cash
  amount: 300
  currency: USD
- kind: money_market_fund
  instrument_id: "PPF"
  units: 10000
  average_cost: 1.25
"#;

        let cash: Vec<CashItem> = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            cash[0],
            CashItem::PlainCash {
                amount: 25000.0,
                currency: Currency::TRY
            }
        );
        assert_eq!(
            cash[1],
            CashItem::PlainCash {
                amount: 300.0,
                currency: Currency::USD
            }
        );
        if let CashItem::MoneyMarketFund {
            instrument_id,
            units,
            average_cost,
        } = &cash[2]
        {
            assert_eq!(instrument_id, "PPF");
            assert_eq!(*units, 10000.0);
            assert_eq!(*average_cost, 1.25);
        } else {
            panic!("Expected a money market fund");
        }
    }

    #[test]
    fn test_unknown_asset_type_rejected() {
        let yaml_str = r#"
instrument_id: "XYZ"
type: bond
amount: 1
average_cost: 1
"#;
        let result: Result<Holding, _> = serde_yaml::from_str(yaml_str);
        assert!(result.is_err());
    }
}
