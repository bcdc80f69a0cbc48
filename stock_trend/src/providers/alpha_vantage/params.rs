use serde::{Deserialize, Serialize};

use crate::models::range::Range;

/// Which time-series function to query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSeriesFunction {
    Daily,
    Weekly,
    Monthly,
}

impl TimeSeriesFunction {
    pub fn as_query(&self) -> &'static str {
        match self {
            TimeSeriesFunction::Daily => "TIME_SERIES_DAILY",
            TimeSeriesFunction::Weekly => "TIME_SERIES_WEEKLY",
            TimeSeriesFunction::Monthly => "TIME_SERIES_MONTHLY",
        }
    }
}

/// How much history a daily query returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSize {
    /// Latest 100 points.
    Compact,
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

/// Picks the cheapest query that still covers `range`.
///
/// Weekly and monthly functions take no output size.
pub fn query_for_range(range: Range) -> (TimeSeriesFunction, Option<OutputSize>) {
    match range {
        Range::OneDay | Range::FiveDays | Range::OneMonth => {
            (TimeSeriesFunction::Daily, Some(OutputSize::Compact))
        }
        Range::SixMonths | Range::YearToDate => (TimeSeriesFunction::Daily, Some(OutputSize::Full)),
        Range::OneYear => (TimeSeriesFunction::Weekly, None),
        Range::FiveYears => (TimeSeriesFunction::Monthly, None),
    }
}

/// Builds the query string for one request, without the API key.
pub fn construct_params(symbol: &str, range: Range) -> Vec<(&'static str, String)> {
    let (function, outputsize) = query_for_range(range);
    let mut params = vec![
        ("function", function.as_query().to_string()),
        ("symbol", symbol.to_string()),
    ];
    if let Some(size) = outputsize {
        params.push(("outputsize", size.as_str().to_string()));
    }
    params
}
