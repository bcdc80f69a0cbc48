//! Multi-provider equity data for a symbol comparison chart.
//!
//! The crate fetches daily closing prices from an ordered chain of upstream
//! providers, merges them into one date-ordered series, looks up live quotes
//! and autocomplete suggestions, and keeps the small piece of session state
//! (tracked symbols, selected symbols, display range) that decides what to
//! fetch. Rendering is left to the caller: it reads a [`session::SessionView`].

#[cfg(feature = "cli")]
pub mod cli;
pub mod aggregator;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod live_quote;
pub mod models;
pub mod providers;
pub mod registry;
pub mod selection;
pub mod session;
pub mod suggest;

pub use errors::Error;
pub use session::Session;
