use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    models::{range::Range, series::Series},
    providers::{
        get_json, parse_base_url,
        yahoo_chart::response::{normalize, ChartEnvelope},
        HistoricalProvider, ProviderError, ProviderInitError, ShapeMismatchSnafu,
    },
};

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    /// Creates a chart provider rooted at `base_url` (the public host, or a
    /// relay that forwards `/v8/finance/chart/...`).
    pub fn new(client: Client, base_url: &str) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl HistoricalProvider for YahooChartProvider {
    fn name(&self) -> &str {
        "yahoo-chart"
    }

    async fn fetch_series(&self, symbol: &str, range: Range) -> Result<Series, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!(%url, %range, "requesting chart");

        let request = self
            .client
            .get(&url)
            .query(&[("range", range.as_token()), ("interval", "1d")]);
        let raw = get_json(request).await?;

        let envelope: ChartEnvelope = serde_json::from_value(raw).map_err(|e| {
            ShapeMismatchSnafu {
                message: format!("chart payload: {e}"),
            }
            .build()
        })?;
        normalize(symbol, envelope)
    }
}
