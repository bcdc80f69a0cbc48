//! Real-time quote record shared by the quote provider and the live poller.

use serde::{Deserialize, Serialize};

/// Latest quote for a symbol.
///
/// Providers may omit any field. A missing value stays `None` and must be
/// shown as unknown rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub current_price: Option<f64>,
    /// Absolute change since the previous close.
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl Quote {
    /// True when the provider supplied none of the fields.
    pub fn is_empty(&self) -> bool {
        self.current_price.is_none()
            && self.change.is_none()
            && self.change_percent.is_none()
            && self.high.is_none()
            && self.low.is_none()
    }
}

/// A quote bound to the symbol it was fetched for, plus the name to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveQuote {
    pub symbol: String,
    pub display_name: String,
    pub quote: Quote,
}
