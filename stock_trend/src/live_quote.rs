//! Real-time quote for the most recently selected symbol.

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::{
    models::quote::LiveQuote,
    providers::QuoteProvider,
    suggest::NameLookup,
};

/// Fetches the live quote for the last element of the selection.
///
/// There is no fallback across quote providers, and no stale carry-over: when
/// the fetch fails the caller gets `None` and must show "no data".
#[derive(Clone)]
pub struct LiveQuotePoller {
    provider: Arc<dyn QuoteProvider>,
}

impl LiveQuotePoller {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// The symbol a refresh would target: the most recently selected one.
    pub fn target(selected: &IndexSet<String>) -> Option<&str> {
        selected.last().map(String::as_str)
    }

    pub async fn refresh(
        &self,
        selected: &IndexSet<String>,
        names: &impl NameLookup,
    ) -> Option<LiveQuote> {
        let Some(symbol) = Self::target(selected) else {
            debug!("no symbol selected, clearing live quote");
            return None;
        };

        match self.provider.fetch_quote(symbol).await {
            Ok(quote) => Some(LiveQuote {
                symbol: symbol.to_string(),
                display_name: names.display_name(symbol),
                quote,
            }),
            Err(e) => {
                warn!(symbol, provider = self.provider.name(), kind = ?e.kind(), error = %e, "live quote failed");
                None
            }
        }
    }
}
