use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyRateProvider;
use crate::core::holding::AssetType;
use crate::core::price::{PriceProvider, PriceQuote, QuoteRequest};
use crate::providers::util::with_retry;

const USER_AGENT: &str = "kumbara/0.1";

/// Retry policy shared by the Yahoo providers.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: usize,
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 2,
            delay_ms: 500,
        }
    }
}

/// Maps an instrument to the Yahoo chart symbol.
///
/// Crypto is always looked up against USD and forex against TRY.
pub fn yahoo_symbol(request: &QuoteRequest) -> String {
    let id = request.instrument_id.trim().to_uppercase();
    match request.asset_type {
        AssetType::Crypto if !id.contains('-') => format!("{id}-USD"),
        AssetType::Forex if !id.ends_with("=X") => format!("{id}TRY=X"),
        _ => id,
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: f64,
    #[serde(alias = "chartPreviousClose", alias = "previousClose")]
    previous_close: Option<f64>,
}

async fn fetch_chart_meta(
    client: &reqwest::Client,
    base_url: &str,
    symbol: &str,
    retry: RetryPolicy,
) -> Result<ChartMeta> {
    let url = format!("{base_url}/v8/finance/chart/{symbol}?interval=1d&range=5d");
    debug!("Requesting chart data from {}", url);

    let response = with_retry(|| client.get(&url).send(), retry.retries, retry.delay_ms)
        .await
        .with_context(|| format!("Request error for symbol: {symbol}"))?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP error: {} for symbol: {}",
            response.status(),
            symbol
        ));
    }

    let text = response.text().await?;
    let data: YahooChartResponse = serde_json::from_str(&text)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

    data.chart
        .result
        .and_then(|items| items.into_iter().next())
        .map(|item| item.meta)
        .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))
}

fn daily_change_percent(meta: &ChartMeta) -> f64 {
    match meta.previous_close {
        Some(prev) if prev > 0.0 => (meta.regular_market_price - prev) / prev * 100.0,
        _ => 0.0,
    }
}

// YahooPriceProvider implementation for PriceProvider
pub struct YahooPriceProvider {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl YahooPriceProvider {
    pub fn new(base_url: &str, retry: RetryPolicy) -> Result<Self> {
        Ok(YahooPriceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            retry,
        })
    }
}

#[async_trait]
impl PriceProvider for YahooPriceProvider {
    #[instrument(
        name = "YahooPriceFetch",
        skip(self, request),
        fields(instrument = %request.instrument_id)
    )]
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<PriceQuote> {
        let symbol = yahoo_symbol(request);
        let meta = fetch_chart_meta(&self.client, &self.base_url, &symbol, self.retry).await?;

        let quote = PriceQuote {
            price: meta.regular_market_price,
            daily_change_percent: daily_change_percent(&meta),
        };
        debug!(?quote, "Received Yahoo quote for {}", symbol);
        Ok(quote)
    }
}

// YahooCurrencyProvider implementation for CurrencyRateProvider
pub struct YahooCurrencyProvider {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl YahooCurrencyProvider {
    pub fn new(base_url: &str, retry: RetryPolicy) -> Result<Self> {
        Ok(YahooCurrencyProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            retry,
        })
    }
}

#[async_trait]
impl CurrencyRateProvider for YahooCurrencyProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let symbol = format!("{from}{to}=X");
        let meta = fetch_chart_meta(&self.client, &self.base_url, &symbol, self.retry)
            .await
            .map_err(|e| anyhow!("Rate lookup failed for currency pair {}: {}", symbol, e))?;
        debug!("Received rate {} for {}", meta.regular_market_price, symbol);
        Ok(meta.regular_market_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NO_RETRY: RetryPolicy = RetryPolicy {
        retries: 0,
        delay_ms: 0,
    };

    pub async fn create_mock_server(symbol: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v8/finance/chart/{symbol}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn request(id: &str, asset_type: AssetType) -> QuoteRequest {
        QuoteRequest {
            instrument_id: id.to_string(),
            asset_type,
        }
    }

    #[test]
    fn test_symbol_mapping() {
        assert_eq!(yahoo_symbol(&request("btc", AssetType::Crypto)), "BTC-USD");
        assert_eq!(yahoo_symbol(&request("ETH-USD", AssetType::Crypto)), "ETH-USD");
        assert_eq!(yahoo_symbol(&request("EUR", AssetType::Forex)), "EURTRY=X");
        assert_eq!(yahoo_symbol(&request("THYAO.IS", AssetType::Stock)), "THYAO.IS");
    }

    #[tokio::test]
    async fn test_successful_quote_fetch() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": {
                        "regularMarketPrice": 105.0,
                        "chartPreviousClose": 100.0,
                        "currency": "TRY"
                    }
                }]
            }
        }"#;
        let mock_server = create_mock_server("THYAO.IS", 200, mock_response).await;

        let provider = YahooPriceProvider::new(&mock_server.uri(), NO_RETRY).unwrap();
        let quote = provider
            .fetch_quote(&request("THYAO.IS", AssetType::Stock))
            .await
            .unwrap();

        assert_eq!(quote.price, 105.0);
        assert!((quote.daily_change_percent - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_crypto_quote_uses_usd_pair() {
        let mock_response = r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 60000.0}}]}}"#;
        let mock_server = create_mock_server("BTC-USD", 200, mock_response).await;

        let provider = YahooPriceProvider::new(&mock_server.uri(), NO_RETRY).unwrap();
        let quote = provider
            .fetch_quote(&request("BTC", AssetType::Crypto))
            .await
            .unwrap();

        assert_eq!(quote.price, 60000.0);
        assert_eq!(quote.daily_change_percent, 0.0);
    }

    #[tokio::test]
    async fn test_no_price_result_data() {
        let mock_server = create_mock_server("INVALID", 200, r#"{"chart": {"result": []}}"#).await;

        let provider = YahooPriceProvider::new(&mock_server.uri(), NO_RETRY).unwrap();
        let result = provider
            .fetch_quote(&request("INVALID", AssetType::Stock))
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No price data found for symbol: INVALID"
        );
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let mock_server = create_mock_server("ASELS.IS", 404, "").await;

        let provider = YahooPriceProvider::new(&mock_server.uri(), NO_RETRY).unwrap();
        let result = provider
            .fetch_quote(&request("ASELS.IS", AssetType::Stock))
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 404 Not Found for symbol: ASELS.IS"
        );
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 34.5678}}]}}"#;
        let mock_server = create_mock_server("USDTRY=X", 200, mock_response).await;

        let provider = YahooCurrencyProvider::new(&mock_server.uri(), NO_RETRY).unwrap();
        let rate = provider
            .get_rate("USD", "TRY")
            .await
            .expect("Failed to get rate");
        assert_eq!(rate, 34.5678);
    }

    #[tokio::test]
    async fn test_malformed_rate_response() {
        let mock_response = r#"{"chart": {"results": []}}"#;
        let mock_server = create_mock_server("USDTRY=X", 200, mock_response).await;

        let provider = YahooCurrencyProvider::new(&mock_server.uri(), NO_RETRY).unwrap();
        let result = provider.get_rate("USD", "TRY").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Rate lookup failed for currency pair USDTRY=X")
        );
    }

    #[tokio::test]
    async fn test_rate_server_error() {
        let mock_server = create_mock_server("USDTRY=X", 500, "").await;

        let provider = YahooCurrencyProvider::new(&mock_server.uri(), NO_RETRY).unwrap();
        let result = provider.get_rate("USD", "TRY").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("HTTP error: 500 Internal Server Error")
        );
    }
}
