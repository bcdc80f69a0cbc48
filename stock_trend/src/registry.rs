//! Provider registry: maps the configuration to concrete adapters.

use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    fetcher::FallbackFetcher,
    providers::{
        alpha_vantage::AlphaVantageProvider, finnhub::FinnhubProvider,
        yahoo_chart::YahooChartProvider, yahoo_search::YahooSearchProvider, HistoricalProvider,
        ProviderInitError, QuoteProvider, SuggestionProvider,
    },
};

/// Builds the historical chain: chart endpoint first, keyed time series second.
///
/// The fallback is skipped (with a warning) when it is disabled or its API key
/// is not set; any other construction error is returned.
pub fn build_fallback_fetcher(
    cfg: &AppConfig,
    client: &Client,
) -> Result<FallbackFetcher, ProviderInitError> {
    let mut chain: Vec<Arc<dyn HistoricalProvider>> = vec![Arc::new(YahooChartProvider::new(
        client.clone(),
        &cfg.relay.base_url,
    )?)];

    if cfg.alpha_vantage.enabled {
        match AlphaVantageProvider::new(client.clone(), &cfg.alpha_vantage) {
            Ok(p) => chain.push(Arc::new(p)),
            Err(ProviderInitError::MissingEnvVar { source, .. }) => {
                warn!(error = %source, "fallback time series provider disabled");
            }
            Err(e) => return Err(e),
        }
    }

    let fetcher = FallbackFetcher::new(chain);
    info!(providers = ?fetcher.provider_names(), "historical provider chain ready");
    Ok(fetcher)
}

pub fn build_quote_provider(
    cfg: &AppConfig,
    client: &Client,
) -> Result<Arc<dyn QuoteProvider>, ProviderInitError> {
    Ok(Arc::new(FinnhubProvider::new(client.clone(), &cfg.finnhub)?))
}

pub fn build_suggestion_provider(
    cfg: &AppConfig,
    client: &Client,
) -> Result<Arc<dyn SuggestionProvider>, ProviderInitError> {
    Ok(Arc::new(YahooSearchProvider::new(
        client.clone(),
        &cfg.relay.base_url,
    )?))
}
