use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    models::series::{Series, SeriesPoint, sort_series},
    providers::{ProviderError, ShapeMismatchSnafu},
};

/// Top-level keys that hold the date-keyed records, in lookup order.
pub const SERIES_KEYS: [&str; 5] = [
    "Time Series (Daily)",
    "Weekly Time Series",
    "Monthly Time Series",
    "Time Series (Weekly)",
    "Time Series (Monthly)",
];

/// Keys the API uses instead of data when it rejects a call.
const NOTICE_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

const CLOSE_KEY: &str = "4. close";

/// Converts a keyed time-series payload into a series for `symbol`.
///
/// Entries whose date or close cannot be parsed are dropped individually; the
/// rest of the payload is still used. The result may be empty.
pub fn normalize(symbol: &str, raw: &Value) -> Result<Series, ProviderError> {
    let Some(obj) = raw.as_object() else {
        return ShapeMismatchSnafu {
            message: "time series payload is not an object",
        }
        .fail();
    };

    let Some(records) = SERIES_KEYS
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(Value::as_object)
    else {
        let message = NOTICE_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(|notice| format!("no time series key: {notice}"))
            .unwrap_or_else(|| "no time series key in payload".to_string());
        return ShapeMismatchSnafu { message }.fail();
    };

    let mut series: Series = records
        .iter()
        .filter_map(|(date, record)| {
            let point = parse_point(symbol, date, record);
            if point.is_none() {
                debug!(symbol, date = %date, "skipping unparsable time series entry");
            }
            point
        })
        .collect();
    sort_series(&mut series);
    Ok(series)
}

fn parse_point(symbol: &str, date: &str, record: &Value) -> Option<SeriesPoint> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let close = parse_close(record.as_object()?)?;
    SeriesPoint::new(date, symbol, close)
}

fn parse_close(record: &Map<String, Value>) -> Option<f64> {
    match record.get(CLOSE_KEY)? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
