//! Symbol search backing autocomplete.

pub mod provider;
pub mod response;

pub use provider::YahooSearchProvider;
