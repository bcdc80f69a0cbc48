//! Autocomplete lookups and the display names they provide.

use std::{collections::HashMap, sync::Arc};

use tracing::warn;

use crate::{
    config::SearchConfig,
    models::suggestion::SymbolSuggestion,
    providers::SuggestionProvider,
};

/// Resolves a symbol to a human-readable name.
pub trait NameLookup {
    fn lookup_name(&self, symbol: &str) -> Option<String>;

    /// The known name of `symbol`, or the symbol itself.
    fn display_name(&self, symbol: &str) -> String {
        self.lookup_name(symbol).unwrap_or_else(|| symbol.to_string())
    }
}

impl NameLookup for HashMap<String, String> {
    fn lookup_name(&self, symbol: &str) -> Option<String> {
        self.get(symbol).cloned()
    }
}

/// Maps partial queries to candidate symbols and remembers the latest answer.
pub struct SuggestionResolver {
    provider: Arc<dyn SuggestionProvider>,
    min_query_len: usize,
    max_results: usize,
    latest: Vec<SymbolSuggestion>,
    /// Names of suggestions the user picked, kept after the list is cleared.
    picked: HashMap<String, String>,
}

impl SuggestionResolver {
    pub fn new(provider: Arc<dyn SuggestionProvider>, cfg: &SearchConfig) -> Self {
        Self {
            provider,
            min_query_len: cfg.min_query_len,
            max_results: cfg.max_results,
            latest: Vec::new(),
            picked: HashMap::new(),
        }
    }

    /// Looks up candidates for `query`.
    ///
    /// Queries shorter than the configured minimum (2 characters by default)
    /// return nothing and issue no request. Provider failures also yield an
    /// empty list. The answer replaces [`latest`](Self::latest) either way.
    pub async fn suggest(&mut self, query: &str) -> Vec<SymbolSuggestion> {
        let query = query.trim();
        self.latest = if query.chars().count() < self.min_query_len {
            Vec::new()
        } else {
            match self.provider.search(query).await {
                Ok(mut found) => {
                    found.truncate(self.max_results);
                    found
                }
                Err(e) => {
                    warn!(query, provider = self.provider.name(), error = %e, "suggestion lookup failed");
                    Vec::new()
                }
            }
        };
        self.latest.clone()
    }

    pub fn latest(&self) -> &[SymbolSuggestion] {
        &self.latest
    }

    /// Hides the current suggestion list.
    pub fn clear(&mut self) {
        self.latest.clear();
    }

    /// Records `symbol` as picked from the current list so its name survives
    /// [`clear`](Self::clear). Returns the matching suggestion, if any.
    pub fn remember(&mut self, symbol: &str) -> Option<SymbolSuggestion> {
        let found = self.latest.iter().find(|s| s.symbol == symbol).cloned()?;
        self.picked
            .insert(found.symbol.clone(), found.display_name.clone());
        Some(found)
    }
}

/// Latest results first, then remembered picks.
impl NameLookup for SuggestionResolver {
    fn lookup_name(&self, symbol: &str) -> Option<String> {
        self.latest
            .iter()
            .find(|s| s.symbol == symbol)
            .map(|s| s.display_name.clone())
            .or_else(|| self.picked.get(symbol).cloned())
    }
}
