use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    config::FinnhubConfig,
    models::quote::Quote,
    providers::{
        finnhub::response::normalize, get_json, parse_base_url, MissingEnvVarSnafu,
        ProviderError, ProviderInitError, QuoteProvider,
    },
};

pub struct FinnhubProvider {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl FinnhubProvider {
    /// Creates a new quote provider.
    ///
    /// Reads the token from the environment variable named by `cfg.api_key_env`
    /// (`FINNHUB_API_KEY` by default).
    pub fn new(client: Client, cfg: &FinnhubConfig) -> Result<Self, ProviderInitError> {
        let token = SecretString::new(get_env_var(&cfg.api_key_env).context(MissingEnvVarSnafu)?.into());
        Ok(Self {
            client,
            base_url: parse_base_url(&cfg.base_url)?,
            token,
        })
    }
}

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn name(&self) -> &str {
        "finnhub"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        debug!(symbol, "requesting quote");
        let request = self
            .client
            .get(format!("{}/quote", self.base_url))
            .query(&[("symbol", symbol), ("token", self.token.expose_secret())]);
        let raw = get_json(request).await?;
        normalize(symbol, raw)
    }
}
