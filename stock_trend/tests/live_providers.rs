//! Calls the real upstream endpoints. Run with `cargo test -- --ignored`;
//! keyed providers read their keys from the environment or a `.env` file.

use stock_trend::{
    config::AppConfig,
    models::range::Range,
    providers::{
        HistoricalProvider, QuoteProvider, SuggestionProvider, alpha_vantage::AlphaVantageProvider,
        build_http_client, finnhub::FinnhubProvider, yahoo_chart::YahooChartProvider,
        yahoo_search::YahooSearchProvider,
    },
};
use serial_test::serial;

fn config() -> AppConfig {
    dotenvy::dotenv().ok();
    AppConfig::default()
}

#[tokio::test]
#[ignore]
async fn chart_endpoint_returns_sorted_points() {
    let cfg = config();
    let client = build_http_client(&cfg.http).unwrap();
    let provider = YahooChartProvider::new(client, &cfg.relay.base_url).unwrap();

    let series = provider.fetch_series("AAPL", Range::OneMonth).await.unwrap();
    assert!(!series.is_empty());
    assert!(series.iter().all(|p| p.symbol == "AAPL" && p.close > 0.0));
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
#[serial]
#[ignore]
async fn time_series_fallback_returns_points() {
    let cfg = config();
    if std::env::var(&cfg.alpha_vantage.api_key_env).is_err() {
        println!("Skipping: {} not set.", cfg.alpha_vantage.api_key_env);
        return;
    }
    let client = build_http_client(&cfg.http).unwrap();
    let provider = AlphaVantageProvider::new(client, &cfg.alpha_vantage).unwrap();

    let series = provider.fetch_series("MSFT", Range::OneMonth).await.unwrap();
    assert!(!series.is_empty());
}

#[tokio::test]
#[serial]
#[ignore]
async fn quote_endpoint_returns_price() {
    let cfg = config();
    if std::env::var(&cfg.finnhub.api_key_env).is_err() {
        println!("Skipping: {} not set.", cfg.finnhub.api_key_env);
        return;
    }
    let client = build_http_client(&cfg.http).unwrap();
    let provider = FinnhubProvider::new(client, &cfg.finnhub).unwrap();

    let quote = provider.fetch_quote("AAPL").await.unwrap();
    assert!(quote.current_price.is_some_and(|p| p > 0.0));
}

#[tokio::test]
#[ignore]
async fn search_endpoint_finds_ticker() {
    let cfg = config();
    let client = build_http_client(&cfg.http).unwrap();
    let provider = YahooSearchProvider::new(client, &cfg.relay.base_url).unwrap();

    let found = provider.search("tesla").await.unwrap();
    assert!(found.iter().any(|s| s.symbol == "TSLA"));
}
