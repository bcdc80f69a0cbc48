use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    config::AlphaVantageConfig,
    models::{
        range::Range,
        series::{Series, trim_to_range},
    },
    providers::{
        alpha_vantage::{params::construct_params, response::normalize},
        get_json, parse_base_url, EmptyResultSnafu, HistoricalProvider, MissingEnvVarSnafu,
        ProviderError, ProviderInitError, RateLimitedSnafu,
    },
};

pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    limiter: DefaultDirectRateLimiter,
}

impl AlphaVantageProvider {
    /// Creates the provider, reading the API key from the environment variable
    /// named by `cfg.api_key_env`.
    pub fn new(client: Client, cfg: &AlphaVantageConfig) -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(get_env_var(&cfg.api_key_env).context(MissingEnvVarSnafu)?.into());
        Self::with_api_key(client, cfg, api_key)
    }

    pub fn with_api_key(
        client: Client,
        cfg: &AlphaVantageConfig,
        api_key: SecretString,
    ) -> Result<Self, ProviderInitError> {
        let per_minute = NonZeroU32::new(cfg.max_requests_per_minute).unwrap_or(nonzero!(1u32));
        Ok(Self {
            client,
            base_url: parse_base_url(&cfg.base_url)?,
            api_key,
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        })
    }
}

#[async_trait]
impl HistoricalProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alpha-vantage"
    }

    async fn fetch_series(&self, symbol: &str, range: Range) -> Result<Series, ProviderError> {
        // Fail fast instead of queueing: the caller is waiting on a whole
        // aggregate cycle.
        if self.limiter.check().is_err() {
            return RateLimitedSnafu { provider: self.name() }.fail();
        }

        let mut query = construct_params(symbol, range);
        query.push(("apikey", self.api_key.expose_secret().to_string()));
        debug!(symbol, %range, function = %query[0].1, "requesting time series");

        let request = self.client.get(format!("{}/query", self.base_url)).query(&query);
        let raw = get_json(request).await?;

        let series = trim_to_range(normalize(symbol, &raw)?, range);
        if series.is_empty() {
            return EmptyResultSnafu { symbol }.fail();
        }
        Ok(series)
    }
}
