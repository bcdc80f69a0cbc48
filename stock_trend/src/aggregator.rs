//! Concurrent multi-symbol fetch and merge.

use futures::future::join_all;
use tracing::info;

use crate::{
    fetcher::{FallbackFetcher, FetchOutcome},
    models::{
        range::Range,
        series::{Series, merge_series},
    },
};

/// One aggregate fetch cycle's output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateOutcome {
    /// All points of all symbols, ordered by (date, symbol).
    pub series: Series,
    /// Symbols for which every provider failed, in request order.
    pub failed: Vec<String>,
}

impl AggregateOutcome {
    /// True when symbols were requested and none of them produced points.
    pub fn is_total_failure(&self, requested: usize) -> bool {
        requested > 0 && self.failed.len() == requested
    }
}

/// Fans the fallback chain out over every symbol and merges the results.
#[derive(Clone)]
pub struct Aggregator {
    fetcher: FallbackFetcher,
}

impl Aggregator {
    pub fn new(fetcher: FallbackFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetches all `symbols` concurrently and waits for every one of them.
    ///
    /// A symbol whose chain is exhausted contributes no points and is listed in
    /// [`AggregateOutcome::failed`]; it never affects the other symbols.
    pub async fn fetch_all<S>(&self, symbols: &[S], range: Range) -> AggregateOutcome
    where
        S: AsRef<str>,
    {
        let outcomes = join_all(
            symbols
                .iter()
                .map(|symbol| self.fetcher.fetch(symbol.as_ref(), range)),
        )
        .await;

        let mut failed = Vec::new();
        let mut parts = Vec::with_capacity(outcomes.len());
        for (symbol, outcome) in symbols.iter().zip(outcomes) {
            match outcome {
                FetchOutcome::Exhausted => failed.push(symbol.as_ref().to_string()),
                fetched => parts.push(fetched.into_series()),
            }
        }

        let series = merge_series(parts);
        info!(
            symbols = symbols.len(),
            failed = failed.len(),
            points = series.len(),
            %range,
            "aggregate fetch complete"
        );
        AggregateOutcome { series, failed }
    }
}
