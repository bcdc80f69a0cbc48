use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    models::suggestion::SymbolSuggestion,
    providers::{
        get_json, parse_base_url, yahoo_search::response::normalize, ProviderError,
        ProviderInitError, SuggestionProvider,
    },
};

pub struct YahooSearchProvider {
    client: Client,
    base_url: String,
}

impl YahooSearchProvider {
    pub fn new(client: Client, base_url: &str) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl SuggestionProvider for YahooSearchProvider {
    fn name(&self) -> &str {
        "yahoo-search"
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolSuggestion>, ProviderError> {
        debug!(query, "requesting suggestions");
        let request = self
            .client
            .get(format!("{}/v1/finance/search", self.base_url))
            .query(&[("q", query), ("lang", "en-US"), ("region", "US")]);

        // A body that is not JSON is a malformed response, not a transport
        // failure, so it fails open like any other bad payload.
        match get_json(request).await {
            Ok(raw) => Ok(normalize(raw)),
            Err(ProviderError::ShapeMismatch { message, .. }) => {
                debug!(query, %message, "search payload unreadable");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
