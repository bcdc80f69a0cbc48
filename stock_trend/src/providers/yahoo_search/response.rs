use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::suggestion::SymbolSuggestion;

#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    #[serde(default)]
    pub quotes: Option<Vec<SearchQuote>>,
}

#[derive(Deserialize, Debug)]
pub struct SearchQuote {
    pub symbol: Option<String>,
    pub shortname: Option<String>,
    pub longname: Option<String>,
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Converts a search payload into unique suggestions.
///
/// Never fails: a payload without a usable `quotes` list yields no
/// suggestions. Entries without a symbol are dropped; the display name falls
/// back from short name to long name to the symbol itself.
pub fn normalize(raw: Value) -> Vec<SymbolSuggestion> {
    let response: SearchResponse = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            debug!(error = %e, "ignoring malformed search payload");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    response
        .quotes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|q| {
            let symbol = non_blank(q.symbol)?;
            let display_name = non_blank(q.shortname)
                .or_else(|| non_blank(q.longname))
                .unwrap_or_else(|| symbol.clone());
            Some(SymbolSuggestion {
                symbol,
                display_name,
            })
        })
        .filter(|s| seen.insert(s.symbol.clone()))
        .collect()
}
