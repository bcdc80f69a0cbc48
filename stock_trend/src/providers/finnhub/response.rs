use serde::Deserialize;
use serde_json::Value;

use crate::{
    models::quote::Quote,
    providers::{EmptyResultSnafu, ProviderError, ShapeMismatchSnafu},
};

#[derive(Deserialize, Debug, Default)]
pub struct FinnhubQuote {
    #[serde(rename = "c")]
    pub current: Option<f64>,
    #[serde(rename = "d")]
    pub change: Option<f64>,
    #[serde(rename = "dp")]
    pub change_percent: Option<f64>,
    #[serde(rename = "h")]
    pub high: Option<f64>,
    #[serde(rename = "l")]
    pub low: Option<f64>,
    #[serde(rename = "t")]
    pub timestamp: Option<i64>,
    pub error: Option<String>,
}

/// Converts a flat quote record for `symbol`.
///
/// Unknown symbols come back as a record of zeros with no timestamp; that is
/// reported as an empty result rather than a zero-priced quote.
pub fn normalize(symbol: &str, raw: Value) -> Result<Quote, ProviderError> {
    if raw.is_null() {
        return ShapeMismatchSnafu {
            message: "quote record is null",
        }
        .fail();
    }
    let record: FinnhubQuote = serde_json::from_value(raw).map_err(|e| {
        ShapeMismatchSnafu {
            message: format!("quote record: {e}"),
        }
        .build()
    })?;

    if let Some(message) = record.error {
        return ShapeMismatchSnafu { message }.fail();
    }

    let quote = Quote {
        current_price: record.current.filter(|v| v.is_finite()),
        change: record.change.filter(|v| v.is_finite()),
        change_percent: record.change_percent.filter(|v| v.is_finite()),
        high: record.high.filter(|v| v.is_finite()),
        low: record.low.filter(|v| v.is_finite()),
    };
    if quote.is_empty() {
        return ShapeMismatchSnafu {
            message: "quote record is empty",
        }
        .fail();
    }

    let unknown_symbol = quote.current_price.unwrap_or(0.0) == 0.0
        && record.timestamp.unwrap_or(0) == 0;
    if unknown_symbol {
        return EmptyResultSnafu { symbol }.fail();
    }
    Ok(quote)
}
