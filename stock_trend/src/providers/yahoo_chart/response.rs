use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use crate::{
    models::series::{dedup_by_date, Series, SeriesPoint},
    providers::{EmptyResultSnafu, ProviderError, ShapeMismatchSnafu},
};

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Deserialize, Debug)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
}

#[derive(Deserialize, Debug)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
}

/// Converts a chart payload into a daily series for `symbol`.
///
/// Timestamps are UNIX seconds and are truncated to their UTC calendar day.
/// Null closes (halted or not-yet-settled sessions) are skipped.
pub fn normalize(symbol: &str, envelope: ChartEnvelope) -> Result<Series, ProviderError> {
    let ChartBody { result, error } = envelope.chart;

    let Some(result) = result.and_then(|r| r.into_iter().next()) else {
        let message = match error {
            Some(ChartApiError { code, description }) => format!(
                "chart error {}: {}",
                code.unwrap_or_default(),
                description.unwrap_or_default()
            ),
            None => "missing chart.result[0]".to_string(),
        };
        return ShapeMismatchSnafu { message }.fail();
    };

    let Some(timestamps) = result.timestamp else {
        return ShapeMismatchSnafu {
            message: "missing timestamp array",
        }
        .fail();
    };
    let Some(closes) = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .and_then(|q| q.close)
    else {
        return ShapeMismatchSnafu {
            message: "missing indicators.quote[0].close array",
        }
        .fail();
    };

    if timestamps.len() != closes.len() {
        debug!(
            symbol,
            timestamps = timestamps.len(),
            closes = closes.len(),
            "chart arrays differ in length, extra entries ignored"
        );
    }

    let points: Vec<SeriesPoint> = timestamps
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            SeriesPoint::new(date, symbol, close?)
        })
        .collect();

    let series = dedup_by_date(points);
    if series.is_empty() {
        return EmptyResultSnafu { symbol }.fail();
    }
    Ok(series)
}
