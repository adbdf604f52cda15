//! Core valuation, scoring and insight logic plus its collaborator abstractions

pub mod aggregate;
pub mod category;
pub mod config;
pub mod currency;
pub mod engine;
pub mod holding;
pub mod insight;
pub mod log;
pub mod price;
pub mod risk;
pub mod trend;
pub mod valuation;

// Re-export main types for cleaner imports
pub use currency::{Currency, CurrencyRateProvider, FxRate};
pub use engine::{PortfolioInput, PortfolioReport, evaluate};
pub use holding::{AssetKind, AssetType, CashItem, Holding};
pub use price::{PriceProvider, PriceQuote, PriceSnapshot, QuoteRequest};
pub use trend::HistoryPoint;
