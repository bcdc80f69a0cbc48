//! Provider abstraction for upstream market data sources.
//!
//! Every upstream gets one adapter that turns the vendor payload into the shared
//! records from [`crate::models`]:
//!
//! - [`HistoricalProvider`] for daily closing-price series (chart endpoint,
//!   keyed time-series endpoint),
//! - [`QuoteProvider`] for the real-time quote,
//! - [`SuggestionProvider`] for symbol search.
//!
//! The traits are async and object safe so the fetch chain can hold an ordered
//! list of `Arc<dyn HistoricalProvider>` and swap implementations at runtime
//! (tests use in-memory fakes).
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use stock_trend::models::{range::Range, series::Series};
//! use stock_trend::providers::{HistoricalProvider, ProviderError};
//!
//! struct Offline;
//!
//! #[async_trait]
//! impl HistoricalProvider for Offline {
//!     fn name(&self) -> &str {
//!         "offline"
//!     }
//!
//!     async fn fetch_series(&self, _symbol: &str, _range: Range) -> Result<Series, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod alpha_vantage;
pub mod finnhub;
pub mod yahoo_chart;
pub mod yahoo_search;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, ResultExt, Snafu};
use tracing::debug;

use crate::{
    config::HttpConfig,
    models::{quote::Quote, range::Range, series::Series, suggestion::SymbolSuggestion},
};

/// Source of daily closing prices for a single symbol.
#[async_trait]
pub trait HistoricalProvider: Send + Sync {
    /// Short identifier used in logs (e.g., "yahoo-chart").
    fn name(&self) -> &str;

    /// Fetches and normalizes the closing-price series of `symbol` over `range`.
    ///
    /// # Returns
    ///
    /// * `Ok(Series)` - Points for `symbol`, ascending by date.
    /// * `Err(ProviderError)` - Transport failure, unexpected payload, or no usable points.
    async fn fetch_series(&self, symbol: &str, range: Range) -> Result<Series, ProviderError>;
}

/// Source of the real-time quote.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, ProviderError>;
}

/// Symbol / company-name search backing autocomplete.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Looks up candidates for `query`. Malformed payloads yield an empty list;
    /// only transport failures are reported as errors.
    async fn search(&self, query: &str) -> Result<Vec<SymbolSuggestion>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// A configured endpoint is not an absolute URL.
    #[snafu(display("Invalid base URL {url:?}: {message}"))]
    InvalidBaseUrl {
        url: String,
        message: String,
        backtrace: Backtrace,
    },
}

/// Coarse classification of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request itself failed: network, non-2xx status, timeout, local quota.
    Transport,
    /// The request succeeded but the payload did not have the expected shape.
    ShapeMismatch,
    /// The payload was well formed but carried no usable data points.
    EmptyResult,
}

/// Errors that can occur within a provider adapter.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Transport {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The upstream answered with a non-success status.
    #[snafu(display("HTTP {status}: {message}"))]
    HttpStatus {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The local rate limit for this provider is exhausted.
    #[snafu(display("Rate limit reached for {provider}"))]
    RateLimited {
        provider: String,
        backtrace: Backtrace,
    },

    /// The payload is missing the fields this adapter depends on.
    #[snafu(display("Unexpected response shape: {message}"))]
    ShapeMismatch {
        message: String,
        backtrace: Backtrace,
    },

    /// The payload was valid but held no usable data for the symbol.
    #[snafu(display("No usable data for {symbol}"))]
    EmptyResult {
        symbol: String,
        backtrace: Backtrace,
    },
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Transport { .. }
            | ProviderError::HttpStatus { .. }
            | ProviderError::RateLimited { .. } => FailureKind::Transport,
            ProviderError::ShapeMismatch { .. } => FailureKind::ShapeMismatch,
            ProviderError::EmptyResult { .. } => FailureKind::EmptyResult,
        }
    }
}

/// Builds the HTTP client shared by all adapters.
pub fn build_http_client(cfg: &HttpConfig) -> Result<Client, ProviderInitError> {
    Client::builder()
        .user_agent(cfg.user_agent.clone())
        .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
        .build()
        .context(ClientBuildSnafu)
}

/// Validates a configured base URL and strips any trailing slash.
pub(crate) fn parse_base_url(url: &str) -> Result<String, ProviderInitError> {
    let trimmed = url.trim().trim_end_matches('/');
    reqwest::Url::parse(trimmed).map_err(|e| {
        InvalidBaseUrlSnafu {
            url: url.to_string(),
            message: e.to_string(),
        }
        .build()
    })?;
    Ok(trimmed.to_string())
}

/// Sends `request` and decodes the body as JSON.
///
/// Network failures and non-2xx statuses map to transport errors; a body that
/// is not JSON at all is a shape mismatch.
pub(crate) async fn get_json(request: RequestBuilder) -> Result<Value, ProviderError> {
    let response = request.send().await.context(TransportSnafu)?;
    let status = response.status();
    debug!(url = %response.url(), status = status.as_u16(), "upstream responded");

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown API error".to_string());
        return HttpStatusSnafu {
            status: status.as_u16(),
            message,
        }
        .fail();
    }

    let body = response.bytes().await.context(TransportSnafu)?;
    serde_json::from_slice(&body).map_err(|e| {
        ShapeMismatchSnafu {
            message: format!("body is not JSON: {e}"),
        }
        .build()
    })
}
