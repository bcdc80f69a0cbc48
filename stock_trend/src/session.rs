//! The single coordinating owner of session state.
//!
//! A [`Session`] holds the selection state machine together with the data
//! derived from it (series, live quote, suggestions) and runs the fetches each
//! transition calls for. All mutation goes through its transition methods or
//! [`Session::dispatch`].
//!
//! Historical fetch cycles carry a generation number. A cycle that completes
//! after a newer one was started is discarded, so a slow response can never
//! overwrite fresher data.

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    aggregator::{AggregateOutcome, Aggregator},
    config::AppConfig,
    errors::Error,
    live_quote::LiveQuotePoller,
    models::{
        quote::LiveQuote, range::Range, series::Series, suggestion::SymbolSuggestion,
    },
    providers::build_http_client,
    registry::{build_fallback_fetcher, build_quote_provider, build_suggestion_provider},
    selection::{Effects, Event, SelectionState, SelectionWarning, normalize_symbol},
    suggest::SuggestionResolver,
};

/// A historical fetch cycle that has been started but not applied.
///
/// Owns everything it needs, so it can be driven on another task while the
/// session keeps handling events.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    pub generation: u64,
    pub symbols: Vec<String>,
    pub range: Range,
}

impl SeriesRequest {
    pub async fn run(self, aggregator: &Aggregator) -> SeriesResponse {
        let outcome = aggregator.fetch_all(&self.symbols, self.range).await;
        SeriesResponse {
            generation: self.generation,
            symbols: self.symbols,
            outcome,
        }
    }
}

/// The completed counterpart of a [`SeriesRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesResponse {
    pub generation: u64,
    /// Symbols the cycle was started for.
    pub symbols: Vec<String>,
    pub outcome: AggregateOutcome,
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView<'a> {
    pub tracked: &'a IndexSet<String>,
    pub selected: &'a IndexSet<String>,
    pub range: Range,
    pub loading: bool,
    pub failed: &'a [String],
    pub live_quote: Option<&'a LiveQuote>,
    pub series: &'a [crate::models::series::SeriesPoint],
}

pub struct Session {
    selection: SelectionState,
    aggregator: Aggregator,
    resolver: SuggestionResolver,
    poller: LiveQuotePoller,
    series: Series,
    failed: Vec<String>,
    live_quote: Option<LiveQuote>,
    /// Generation of the most recently started historical cycle.
    latest_generation: u64,
    /// Generation of the most recently applied historical cycle.
    applied_generation: u64,
}

impl Session {
    pub fn new(
        selection: SelectionState,
        aggregator: Aggregator,
        resolver: SuggestionResolver,
        poller: LiveQuotePoller,
    ) -> Self {
        Self {
            selection,
            aggregator,
            resolver,
            poller,
            series: Vec::new(),
            failed: Vec::new(),
            live_quote: None,
            latest_generation: 0,
            applied_generation: 0,
        }
    }

    /// Wires every provider from `cfg` and seeds the default selection.
    ///
    /// No data is fetched until [`load`](Self::load) is called.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, Error> {
        let client = build_http_client(&cfg.http)?;
        let aggregator = Aggregator::new(build_fallback_fetcher(cfg, &client)?);
        let resolver = SuggestionResolver::new(build_suggestion_provider(cfg, &client)?, &cfg.search);
        let poller = LiveQuotePoller::new(build_quote_provider(cfg, &client)?);
        let selection = SelectionState::new(&cfg.session.default_symbols, cfg.session.default_range);
        Ok(Self::new(selection, aggregator, resolver, poller))
    }

    pub fn tracked(&self) -> &IndexSet<String> {
        self.selection.tracked()
    }

    pub fn selected(&self) -> &IndexSet<String> {
        self.selection.selected()
    }

    pub fn range(&self) -> Range {
        self.selection.range()
    }

    pub fn series(&self) -> &[crate::models::series::SeriesPoint] {
        &self.series
    }

    /// Symbols that produced no points in the last applied cycle.
    pub fn failed_symbols(&self) -> &[String] {
        &self.failed
    }

    pub fn live_quote(&self) -> Option<&LiveQuote> {
        self.live_quote.as_ref()
    }

    pub fn suggestions(&self) -> &[SymbolSuggestion] {
        self.resolver.latest()
    }

    /// True while a started historical cycle has not been applied yet.
    pub fn loading(&self) -> bool {
        self.latest_generation > self.applied_generation
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            tracked: self.tracked(),
            selected: self.selected(),
            range: self.range(),
            loading: self.loading(),
            failed: &self.failed,
            live_quote: self.live_quote.as_ref(),
            series: &self.series,
        }
    }

    /// Initial fetch of both the series and the live quote.
    pub async fn load(&mut self) {
        self.run_effects(Effects {
            refetch_series: true,
            refresh_quote: true,
        })
        .await;
    }

    pub async fn dispatch(&mut self, event: Event) -> Result<Effects, SelectionWarning> {
        debug!(?event, "dispatching");
        let effects = self.selection.apply(event)?;
        self.run_effects(effects).await;
        Ok(effects)
    }

    pub async fn add_symbol(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        self.dispatch(Event::AddSymbol(symbol.to_string())).await
    }

    pub async fn remove_symbol(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        self.dispatch(Event::RemoveSymbol(symbol.to_string())).await
    }

    pub async fn toggle_select(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        self.dispatch(Event::ToggleSelect(symbol.to_string())).await
    }

    pub async fn select_from_chart_click(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        self.dispatch(Event::ChartClick(symbol.to_string())).await
    }

    pub async fn set_range(&mut self, range: Range) -> Result<Effects, SelectionWarning> {
        self.dispatch(Event::SetRange(range)).await
    }

    pub async fn suggest(&mut self, query: &str) -> Vec<SymbolSuggestion> {
        self.resolver.suggest(query).await
    }

    /// Adds a symbol chosen from the suggestion list.
    ///
    /// The list is hidden and the chosen entry's name is kept for the live
    /// quote, even when the symbol turns out to be tracked already.
    pub async fn pick_suggestion(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        let symbol = normalize_symbol(symbol)?;
        self.resolver.remember(&symbol);
        self.resolver.clear();
        self.add_symbol(&symbol).await
    }

    /// Starts a historical cycle for the current tracked symbols and range.
    pub fn begin_series_fetch(&mut self) -> SeriesRequest {
        self.latest_generation += 1;
        SeriesRequest {
            generation: self.latest_generation,
            symbols: self.selection.tracked().iter().cloned().collect(),
            range: self.selection.range(),
        }
    }

    /// Applies a completed cycle. Returns `false` when it was discarded as
    /// stale.
    ///
    /// If every requested symbol failed, the previous series stays on display,
    /// minus points of symbols the cycle no longer covers.
    pub fn complete_series_fetch(&mut self, response: SeriesResponse) -> bool {
        if response.generation < self.latest_generation {
            debug!(
                generation = response.generation,
                latest = self.latest_generation,
                "discarding stale series"
            );
            return false;
        }
        self.applied_generation = response.generation;

        let SeriesResponse {
            symbols, outcome, ..
        } = response;
        if outcome.is_total_failure(symbols.len()) {
            warn!(symbols = ?outcome.failed, "every symbol failed, keeping previous series");
            self.series.retain(|p| symbols.contains(&p.symbol));
        } else {
            self.series = outcome.series;
        }
        self.failed = outcome.failed;
        true
    }

    /// Re-fetches the live quote for the current target.
    pub async fn refresh_live_quote(&mut self) {
        self.live_quote = self
            .poller
            .refresh(self.selection.selected(), &self.resolver)
            .await;
    }

    async fn run_effects(&mut self, effects: Effects) {
        if effects.is_none() {
            return;
        }
        let request = effects.refetch_series.then(|| self.begin_series_fetch());

        let aggregator = &self.aggregator;
        let poller = &self.poller;
        let selected = self.selection.selected();
        let resolver = &self.resolver;

        let (response, quote) = futures::join!(
            async move {
                match request {
                    Some(r) => Some(r.run(aggregator).await),
                    None => None,
                }
            },
            async move {
                if effects.refresh_quote {
                    Some(poller.refresh(selected, resolver).await)
                } else {
                    None
                }
            }
        );

        if let Some(response) = response {
            self.complete_series_fetch(response);
        }
        if let Some(quote) = quote {
            self.live_quote = quote;
        }
        info!(
            tracked = self.tracked().len(),
            selected = self.selected().len(),
            points = self.series.len(),
            live = self.live_quote.as_ref().map(|q| q.symbol.as_str()),
            "session updated"
        );
    }
}
