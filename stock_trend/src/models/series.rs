//! Canonical in-memory representation of a daily closing-price series.
//!
//! Every historical [`HistoricalProvider`](crate::providers::HistoricalProvider)
//! normalizes its upstream payload into [`SeriesPoint`]s, regardless of how the
//! vendor lays out its response.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::range::Range;

/// A single daily closing price for one symbol.
///
/// Serializes as `{"date": "YYYY-MM-DD", "symbol": "...", "close": 123.4}`, the
/// shape consumed by the chart layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Calendar day (UTC) this close belongs to.
    pub date: NaiveDate,

    /// Symbol this point belongs to (e.g., "AAPL").
    pub symbol: String,

    /// Closing price. Always finite and non-negative.
    pub close: f64,
}

impl SeriesPoint {
    /// Builds a point, rejecting closes that are NaN, infinite or negative.
    pub fn new(date: NaiveDate, symbol: impl Into<String>, close: f64) -> Option<Self> {
        if !close.is_finite() || close < 0.0 {
            return None;
        }
        Some(Self {
            date,
            symbol: symbol.into(),
            close,
        })
    }

    fn order_key(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.symbol.cmp(&other.symbol))
    }
}

/// Ordered sequence of points, ascending by date with ties broken by symbol.
pub type Series = Vec<SeriesPoint>;

/// Sorts `points` by (date, symbol). The sort is stable.
pub fn sort_series(points: &mut [SeriesPoint]) {
    points.sort_by(SeriesPoint::order_key);
}

/// Keeps one point per date for a single-symbol series, preferring the last
/// occurrence, and returns the points in ascending date order.
///
/// Some upstreams repeat the current trading day (a settled bar plus a live
/// one); the later entry is the fresher close.
pub fn dedup_by_date(points: Vec<SeriesPoint>) -> Series {
    let mut by_date: indexmap::IndexMap<NaiveDate, SeriesPoint> = indexmap::IndexMap::new();
    for point in points {
        by_date.insert(point.date, point);
    }
    let mut out: Series = by_date.into_values().collect();
    sort_series(&mut out);
    out
}

/// Concatenates per-symbol series into one globally ordered series.
pub fn merge_series<I>(parts: I) -> Series
where
    I: IntoIterator<Item = Series>,
{
    let mut merged: Series = parts.into_iter().flatten().collect();
    sort_series(&mut merged);
    merged
}

/// Drops points older than `range` allows, measured back from the newest
/// point. Expects `series` in ascending date order.
pub fn trim_to_range(series: Series, range: Range) -> Series {
    let Some(latest) = series.last().map(|p| p.date) else {
        return series;
    };
    let start = range.window_start(latest);
    series.into_iter().filter(|p| p.date >= start).collect()
}
