pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::currency::CurrencyRateProvider;
use crate::core::engine::{self, PortfolioInput, PortfolioReport};
use crate::core::price::PriceProvider;
use crate::core::trend::HistoryPoint;
use crate::providers::StaticPriceProvider;
use crate::providers::tefas::TefasSnapshotProvider;
use crate::providers::yahoo_finance::{RetryPolicy, YahooCurrencyProvider, YahooPriceProvider};
use crate::store::HistoryStore;
use anyhow::Result;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Summary,
    Alloc,
    Insights,
    Record,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("kumbara starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Summary => {
            let report = build_report(&config, Vec::new()).await?;
            cli::summary::run(&config.name, &report, config.currency);
        }
        AppCommand::Alloc => {
            let report = build_report(&config, Vec::new()).await?;
            cli::alloc::run(&config.name, &report, config.currency);
        }
        AppCommand::Insights => {
            let history = load_history(&config)?;
            let report = build_report(&config, history).await?;
            cli::insights::run(&config.name, &report);
        }
        AppCommand::Record => {
            let store = HistoryStore::open(&config.history_path()?)?;
            let report = build_report(&config, Vec::new()).await?;
            cli::record::run(&store, &report, chrono::Utc::now())?;
        }
    }
    Ok(())
}

/// Recorded history, empty when nothing was recorded yet.
fn load_history(config: &AppConfig) -> Result<Vec<HistoryPoint>> {
    let path = config.history_path()?;
    if !path.exists() {
        debug!("No history at {}", path.display());
        return Ok(Vec::new());
    }
    HistoryStore::open(&path)?.load()
}

fn load_tefas(config: &AppConfig) -> Option<TefasSnapshotProvider> {
    let tefas_config = config.providers.tefas.as_ref()?;
    match TefasSnapshotProvider::load(&tefas_config.snapshot_path) {
        Ok(provider) => {
            provider.warn_if_stale(chrono::Local::now().date_naive());
            Some(provider)
        }
        Err(e) => {
            warn!("TEFAS prices unavailable: {:#}", e);
            None
        }
    }
}

/// Fetches quotes and the exchange rate, then runs the core once.
async fn build_report(config: &AppConfig, history: Vec<HistoryPoint>) -> Result<PortfolioReport> {
    let overrides = StaticPriceProvider::new(&config.prices);
    let tefas = load_tefas(config);
    let yahoo = match &config.providers.yahoo {
        Some(yahoo_config) => {
            let retry = RetryPolicy {
                retries: yahoo_config.retries,
                delay_ms: yahoo_config.retry_delay_ms,
            };
            Some((
                YahooPriceProvider::new(&yahoo_config.base_url, retry)?,
                YahooCurrencyProvider::new(&yahoo_config.base_url, retry)?,
            ))
        }
        None => None,
    };

    let mut price_providers: Vec<&dyn PriceProvider> = vec![&overrides];
    if let Some(tefas) = &tefas {
        price_providers.push(tefas);
    }
    if let Some((prices, _)) = &yahoo {
        price_providers.push(prices);
    }
    let rate_provider = yahoo
        .as_ref()
        .map(|(_, rates)| rates as &dyn CurrencyRateProvider);

    let requests = providers::quote_requests(&config.holdings, &config.cash);
    let pb = cli::ui::new_progress_bar(requests.len() as u64, "Fetching prices...");
    let on_progress = || pb.inc(1);
    let (prices, fx_rate) = futures::join!(
        providers::resolve_snapshot(&requests, &price_providers, &on_progress),
        providers::resolve_fx_rate(rate_provider, &config.fx)
    );
    pb.finish_and_clear();

    Ok(engine::evaluate(&PortfolioInput {
        holdings: config.holdings.clone(),
        cash: config.cash.clone(),
        prices,
        fx_rate,
        history,
    }))
}
