//! Fund prices from a daily TEFAS snapshot file.
//!
//! The snapshot is produced by an external fetcher and looks like
//! `{ "lastUpdated": "...", "count": N, "data": { "PPF": { "price": 1.23,
//! "dailyChange": 0.11, "name": "..." } } }`.

use crate::core::holding::AssetType;
use crate::core::price::{PriceProvider, PriceQuote, QuoteRequest};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    last_updated: Option<String>,
    #[serde(default)]
    data: HashMap<String, FundEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundEntry {
    pub price: Option<f64>,
    #[serde(default)]
    pub daily_change: f64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug)]
pub struct TefasSnapshotProvider {
    funds: HashMap<String, FundEntry>,
    last_updated: Option<NaiveDateTime>,
}

impl TefasSnapshotProvider {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read TEFAS snapshot: {}", path.as_ref().display())
        })?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to parse TEFAS snapshot: {}", path.as_ref().display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        let last_updated = file.last_updated.as_deref().and_then(parse_timestamp);
        let funds = file
            .data
            .into_iter()
            .map(|(code, entry)| (code.to_uppercase(), entry))
            .collect::<HashMap<_, _>>();
        debug!("Loaded {} funds from TEFAS snapshot", funds.len());
        Ok(TefasSnapshotProvider {
            funds,
            last_updated,
        })
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    pub fn fund(&self, code: &str) -> Option<&FundEntry> {
        self.funds.get(&code.trim().to_uppercase())
    }

    pub fn last_updated(&self) -> Option<NaiveDateTime> {
        self.last_updated
    }

    /// A snapshot is stale when it predates the last TEFAS working day.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        match self.last_updated {
            Some(ts) => ts.date() < previous_working_day(today),
            None => true,
        }
    }

    /// Logs a warning when the snapshot looks outdated.
    pub fn warn_if_stale(&self, today: NaiveDate) {
        if self.is_stale(today) {
            warn!(
                last_updated = ?self.last_updated,
                "TEFAS snapshot is older than the previous working day"
            );
        }
    }
}

// Fetcher writes Python isoformat() timestamps, usually without an offset.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Most recent weekday strictly before `today`, skipping weekends.
pub fn previous_working_day(today: NaiveDate) -> NaiveDate {
    let days_back = match today.weekday() {
        Weekday::Mon => 3,
        Weekday::Sun => 2,
        _ => 1,
    };
    today - Duration::days(days_back)
}

#[async_trait]
impl PriceProvider for TefasSnapshotProvider {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<PriceQuote> {
        if request.asset_type != AssetType::Fund {
            return Err(anyhow!("TEFAS only serves funds, not {}", request.asset_type));
        }
        let entry = self
            .fund(&request.instrument_id)
            .ok_or_else(|| anyhow!("Fund not found in TEFAS snapshot: {}", request.instrument_id))?;
        match entry.price {
            Some(price) if price > 0.0 => Ok(PriceQuote {
                price,
                daily_change_percent: entry.daily_change,
            }),
            _ => Err(anyhow!(
                "TEFAS snapshot has no price for fund: {}",
                request.instrument_id
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "lastUpdated": "2025-03-07T18:02:11.512345",
        "count": 3,
        "data": {
            "PPF": {"code": "PPF", "price": 1.874512, "date": "1741305600000", "dailyChange": 0.13, "name": "PARA PİYASASI FONU", "fetchedAt": "2025-03-07T18:02:10"},
            "TTE": {"code": "TTE", "price": 5.12, "dailyChange": -1.2, "name": "HİSSE SENEDİ FONU"},
            "XYZ": {"code": "XYZ", "price": null}
        }
    }"#;

    fn request(code: &str) -> QuoteRequest {
        QuoteRequest {
            instrument_id: code.to_string(),
            asset_type: AssetType::Fund,
        }
    }

    #[tokio::test]
    async fn test_quotes_from_snapshot() {
        let provider = TefasSnapshotProvider::from_json(SNAPSHOT).unwrap();
        assert_eq!(provider.len(), 3);

        let quote = provider.fetch_quote(&request("ppf")).await.unwrap();
        assert_eq!(quote.price, 1.874512);
        assert_eq!(quote.daily_change_percent, 0.13);
        assert_eq!(provider.fund("TTE").unwrap().name, "HİSSE SENEDİ FONU");
    }

    #[tokio::test]
    async fn test_missing_or_null_price_is_error() {
        let provider = TefasSnapshotProvider::from_json(SNAPSHOT).unwrap();
        assert!(provider.fetch_quote(&request("XYZ")).await.is_err());
        let err = provider.fetch_quote(&request("AAA")).await.unwrap_err();
        assert_eq!(err.to_string(), "Fund not found in TEFAS snapshot: AAA");

        let stock = QuoteRequest {
            instrument_id: "PPF".to_string(),
            asset_type: AssetType::Stock,
        };
        assert!(provider.fetch_quote(&stock).await.is_err());
    }

    #[test]
    fn test_previous_working_day() {
        let fri = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let sat = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        let sun = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let mon = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let tue = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();

        assert_eq!(previous_working_day(sat), fri);
        assert_eq!(previous_working_day(sun), fri);
        assert_eq!(previous_working_day(mon), fri);
        assert_eq!(previous_working_day(tue), mon);
        assert_eq!(previous_working_day(fri), NaiveDate::from_ymd_opt(2025, 3, 6).unwrap());
    }

    #[test]
    fn test_staleness() {
        let provider = TefasSnapshotProvider::from_json(SNAPSHOT).unwrap();
        assert_eq!(
            provider.last_updated().unwrap().date(),
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
        );
        // Friday data is fresh through the weekend and on Monday.
        assert!(!provider.is_stale(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()));
        assert!(!provider.is_stale(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
        assert!(provider.is_stale(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()));

        let undated = TefasSnapshotProvider::from_json(r#"{"data": {}}"#).unwrap();
        assert!(undated.is_empty());
        assert!(undated.is_stale(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tefas_data.json");
        std::fs::write(&path, "not json").unwrap();
        let err = TefasSnapshotProvider::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TEFAS snapshot"));

        std::fs::write(&path, SNAPSHOT).unwrap();
        assert_eq!(TefasSnapshotProvider::load(&path).unwrap().len(), 3);
    }
}
