//! Fallback historical source: keyed daily/weekly/monthly time series.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::AlphaVantageProvider;
