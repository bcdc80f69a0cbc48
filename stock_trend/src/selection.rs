//! Tracked/selected symbols and the active range.
//!
//! [`SelectionState`] is a pure state machine: each transition mutates the
//! state and reports which derived data ([`Effects`]) went stale. It performs
//! no I/O; [`Session`](crate::session::Session) runs the effects.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::range::Range;

/// A user action the state machine reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    AddSymbol(String),
    RemoveSymbol(String),
    ToggleSelect(String),
    ChartClick(String),
    SetRange(Range),
}

/// Why a transition was rejected. The state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionWarning {
    #[error("{0} is already in the comparison list")]
    AlreadyTracked(String),

    #[error("{0} is not in the comparison list")]
    NotTracked(String),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("{0:?} is not a valid ticker symbol")]
    InvalidSymbol(String),
}

/// Derived data a transition invalidated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// The historical series must be re-fetched for all tracked symbols.
    pub refetch_series: bool,
    /// The live quote must be re-fetched for the new target.
    pub refresh_quote: bool,
}

impl Effects {
    pub const NONE: Effects = Effects {
        refetch_series: false,
        refresh_quote: false,
    };
    const SERIES: Effects = Effects {
        refetch_series: true,
        refresh_quote: false,
    };
    const QUOTE: Effects = Effects {
        refetch_series: false,
        refresh_quote: true,
    };

    pub fn is_none(&self) -> bool {
        *self == Effects::NONE
    }
}

/// Canonical form of a user-entered symbol: trimmed and upper-cased.
///
/// Only ASCII letters, digits and `.^=-` are accepted (`BRK.B`, `^GSPC`,
/// `EURUSD=X`, `BTC-USD`). Symbols end up in URL paths.
pub fn normalize_symbol(raw: &str) -> Result<String, SelectionWarning> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(SelectionWarning::EmptySymbol);
    }
    let valid = symbol
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '^' | '=' | '-'));
    if !valid {
        return Err(SelectionWarning::InvalidSymbol(symbol));
    }
    Ok(symbol)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    tracked: IndexSet<String>,
    /// Always a subset of `tracked`; the last element drives the live quote.
    selected: IndexSet<String>,
    range: Range,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(["AAPL", "TSLA"], Range::default())
    }
}

impl SelectionState {
    /// Starts with `symbols` tracked and all of them selected. Blank entries and
    /// duplicates are dropped.
    pub fn new<I, S>(symbols: I, range: Range) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tracked: IndexSet<String> = symbols
            .into_iter()
            .filter_map(|s| normalize_symbol(s.as_ref()).ok())
            .collect();
        Self {
            selected: tracked.clone(),
            tracked,
            range,
        }
    }

    pub fn tracked(&self) -> &IndexSet<String> {
        &self.tracked
    }

    pub fn selected(&self) -> &IndexSet<String> {
        &self.selected
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn apply(&mut self, event: Event) -> Result<Effects, SelectionWarning> {
        match event {
            Event::AddSymbol(s) => self.add_symbol(&s),
            Event::RemoveSymbol(s) => self.remove_symbol(&s),
            Event::ToggleSelect(s) => self.toggle_select(&s),
            Event::ChartClick(s) => self.select_from_chart_click(&s),
            Event::SetRange(r) => Ok(self.set_range(r)),
        }
    }

    /// Appends `symbol` to the tracked list. Newly added symbols are not
    /// selected.
    pub fn add_symbol(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        let symbol = normalize_symbol(symbol)?;
        if self.tracked.contains(&symbol) {
            return Err(SelectionWarning::AlreadyTracked(symbol));
        }
        self.tracked.insert(symbol);
        Ok(Effects::SERIES)
    }

    /// Drops `symbol` from both lists.
    pub fn remove_symbol(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        let symbol = normalize_symbol(symbol)?;
        if !self.tracked.shift_remove(&symbol) {
            return Err(SelectionWarning::NotTracked(symbol));
        }
        let was_target = self.selected.last() == Some(&symbol);
        self.selected.shift_remove(&symbol);
        Ok(Effects {
            refetch_series: true,
            refresh_quote: was_target,
        })
    }

    /// Deselects `symbol` if selected, otherwise selects it as the newest entry.
    pub fn toggle_select(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        let symbol = self.require_tracked(symbol)?;
        if !self.selected.shift_remove(&symbol) {
            self.selected.insert(symbol);
        }
        Ok(Effects::QUOTE)
    }

    /// Replaces the whole selection with `symbol`.
    pub fn select_from_chart_click(&mut self, symbol: &str) -> Result<Effects, SelectionWarning> {
        let symbol = self.require_tracked(symbol)?;
        self.selected.clear();
        self.selected.insert(symbol);
        Ok(Effects::QUOTE)
    }

    /// Switches the display range. Re-selecting the active range is a no-op.
    pub fn set_range(&mut self, range: Range) -> Effects {
        if self.range == range {
            return Effects::NONE;
        }
        self.range = range;
        Effects::SERIES
    }

    fn require_tracked(&self, symbol: &str) -> Result<String, SelectionWarning> {
        let symbol = normalize_symbol(symbol)?;
        if !self.tracked.contains(&symbol) {
            return Err(SelectionWarning::NotTracked(symbol));
        }
        Ok(symbol)
    }
}
