#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use stock_trend::{
    aggregator::Aggregator,
    config::SearchConfig,
    fetcher::FallbackFetcher,
    live_quote::LiveQuotePoller,
    models::{
        quote::Quote,
        range::Range,
        series::{Series, SeriesPoint},
        suggestion::SymbolSuggestion,
    },
    providers::{
        EmptyResultSnafu, FailureKind, HistoricalProvider, HttpStatusSnafu, ProviderError,
        QuoteProvider, ShapeMismatchSnafu, SuggestionProvider,
    },
    selection::SelectionState,
    session::Session,
    suggest::SuggestionResolver,
};

/// What a scripted provider answers for one symbol.
#[derive(Clone, Debug)]
pub enum Reply {
    /// `n` consecutive daily points starting at `start`.
    Points { start: NaiveDate, n: u64, close: f64 },
    Fail(FailureKind),
    NoPoints,
}

pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
}

pub fn points(n: u64) -> Reply {
    Reply::Points {
        start: base_date(),
        n,
        close: 100.0,
    }
}

pub fn make_series(symbol: &str, start: NaiveDate, n: u64, close: f64) -> Series {
    (0..n)
        .filter_map(|i| {
            let date = start.checked_add_days(Days::new(i))?;
            SeriesPoint::new(date, symbol, close + i as f64)
        })
        .collect()
}

pub fn failure(kind: FailureKind, symbol: &str) -> ProviderError {
    match kind {
        FailureKind::Transport => HttpStatusSnafu {
            status: 503u16,
            message: "service unavailable",
        }
        .build(),
        FailureKind::ShapeMismatch => ShapeMismatchSnafu {
            message: "missing timestamp array",
        }
        .build(),
        FailureKind::EmptyResult => EmptyResultSnafu { symbol }.build(),
    }
}

/// Historical provider answering from a per-symbol script and counting calls.
pub struct ScriptedHistorical {
    name: String,
    replies: Mutex<HashMap<String, Reply>>,
    default: Reply,
    pub calls: Mutex<Vec<(String, Range)>>,
}

impl ScriptedHistorical {
    pub fn new(name: &str, default: Reply) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            replies: Mutex::new(HashMap::new()),
            default,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with(self: Arc<Self>, symbol: &str, reply: Reply) -> Arc<Self> {
        self.replies
            .lock()
            .unwrap()
            .insert(symbol.to_string(), reply);
        self
    }

    pub fn set(&self, symbol: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .insert(symbol.to_string(), reply);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, symbol: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == symbol)
            .count()
    }
}

#[async_trait]
impl HistoricalProvider for ScriptedHistorical {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_series(&self, symbol: &str, range: Range) -> Result<Series, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), range));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| self.default.clone());
        match reply {
            Reply::Points { start, n, close } => Ok(make_series(symbol, start, n, close)),
            Reply::Fail(kind) => Err(failure(kind, symbol)),
            Reply::NoPoints => Ok(Vec::new()),
        }
    }
}

/// Quote provider that fails for the symbols listed in `failing`.
#[derive(Default)]
pub struct FakeQuotes {
    pub failing: Mutex<Vec<String>>,
    pub asked: Mutex<Vec<String>>,
}

impl FakeQuotes {
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteProvider for FakeQuotes {
    fn name(&self) -> &str {
        "fake-quotes"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        self.asked.lock().unwrap().push(symbol.to_string());
        if self.failing.lock().unwrap().iter().any(|s| s == symbol) {
            return Err(failure(FailureKind::Transport, symbol));
        }
        Ok(Quote {
            current_price: Some(250.0),
            change: Some(1.25),
            change_percent: Some(0.5),
            high: Some(260.0),
            low: Some(240.0),
        })
    }
}

/// Search provider returning a fixed list and counting requests.
#[derive(Default)]
pub struct FakeSearch {
    pub results: Vec<SymbolSuggestion>,
    pub calls: AtomicUsize,
}

impl FakeSearch {
    pub fn with(results: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            results: results
                .iter()
                .map(|(symbol, name)| SymbolSuggestion {
                    symbol: symbol.to_string(),
                    display_name: name.to_string(),
                })
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionProvider for FakeSearch {
    fn name(&self) -> &str {
        "fake-search"
    }

    async fn search(&self, _query: &str) -> Result<Vec<SymbolSuggestion>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

pub fn chain(providers: &[Arc<ScriptedHistorical>]) -> FallbackFetcher {
    FallbackFetcher::new(
        providers
            .iter()
            .map(|p| p.clone() as Arc<dyn HistoricalProvider>)
            .collect(),
    )
}

/// Everything a session test needs to inspect after driving the session.
pub struct Harness {
    pub session: Session,
    pub primary: Arc<ScriptedHistorical>,
    pub secondary: Arc<ScriptedHistorical>,
    pub quotes: Arc<FakeQuotes>,
    pub search: Arc<FakeSearch>,
}

pub fn harness(symbols: &[&str], range: Range) -> Harness {
    let primary = ScriptedHistorical::new("primary", points(20));
    let secondary = ScriptedHistorical::new("secondary", Reply::Fail(FailureKind::Transport));
    let quotes = Arc::new(FakeQuotes::default());
    let search = FakeSearch::with(&[("TSLA", "Tesla, Inc."), ("AAPL", "Apple Inc.")]);

    let session = Session::new(
        SelectionState::new(symbols.iter().copied(), range),
        Aggregator::new(chain(&[primary.clone(), secondary.clone()])),
        SuggestionResolver::new(search.clone(), &SearchConfig::default()),
        LiveQuotePoller::new(quotes.clone()),
    );

    Harness {
        session,
        primary,
        secondary,
        quotes,
        search,
    }
}

pub fn assert_sorted(series: &[SeriesPoint]) {
    for pair in series.windows(2) {
        assert!(
            (pair[0].date, &pair[0].symbol) <= (pair[1].date, &pair[1].symbol),
            "series out of order at {:?} / {:?}",
            pair[0],
            pair[1]
        );
    }
}
