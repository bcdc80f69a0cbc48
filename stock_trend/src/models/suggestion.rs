use serde::{Deserialize, Serialize};

/// One autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSuggestion {
    pub symbol: String,
    pub display_name: String,
}
