//! Ordered provider chain for historical series.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    models::{range::Range, series::Series},
    providers::HistoricalProvider,
};

/// Result of running the chain for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A provider produced points.
    Fetched {
        /// Name of the provider that answered.
        provider: String,
        series: Series,
    },
    /// Every provider failed or returned nothing.
    Exhausted,
}

impl FetchOutcome {
    pub fn into_series(self) -> Series {
        match self {
            FetchOutcome::Fetched { series, .. } => series,
            FetchOutcome::Exhausted => Vec::new(),
        }
    }
}

/// Tries historical providers in priority order until one returns points.
///
/// Never fails: provider errors are logged and the next provider is tried.
#[derive(Clone)]
pub struct FallbackFetcher {
    providers: Vec<Arc<dyn HistoricalProvider>>,
}

impl FallbackFetcher {
    /// `providers` is the priority order, primary first.
    pub fn new(providers: Vec<Arc<dyn HistoricalProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn fetch(&self, symbol: &str, range: Range) -> FetchOutcome {
        for provider in &self.providers {
            match provider.fetch_series(symbol, range).await {
                Ok(series) if !series.is_empty() => {
                    debug!(symbol, provider = provider.name(), points = series.len(), "series fetched");
                    return FetchOutcome::Fetched {
                        provider: provider.name().to_string(),
                        series,
                    };
                }
                Ok(_) => {
                    warn!(symbol, provider = provider.name(), "provider returned no points, trying next");
                }
                Err(e) => {
                    warn!(
                        symbol,
                        provider = provider.name(),
                        kind = ?e.kind(),
                        error = %e,
                        "provider failed, trying next"
                    );
                }
            }
        }
        warn!(symbol, %range, "all historical providers failed");
        FetchOutcome::Exhausted
    }
}
